pub mod digest;
#[cfg(test)]
pub mod testutil;
