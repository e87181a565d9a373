mod common;
mod script_tests;
