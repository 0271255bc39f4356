//! One module per subcommand.

pub mod params;
pub mod salt;
