mod command_tests;
mod common;
mod sandbox_tests;
