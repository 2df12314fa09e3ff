mod root;
mod run;

pub use root::Cli;
pub use run::RunCommand;
