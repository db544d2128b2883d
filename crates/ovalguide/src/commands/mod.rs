pub mod init;
pub mod interactive;
pub mod lookup;
pub mod results;
