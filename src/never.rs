/// Stable stand-in for the unstable `!` type, for tasks that only ever exit
/// through an error.
#[derive(Debug)]
pub enum Never {}
