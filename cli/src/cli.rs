use clap::{Parser, Subcommand, ValueHint};

#[derive(Parser)]
#[command(about, version, name = "sparql-gateway")]
/// Read-only HTTP gateway in front of SPARQL triple-store endpoints
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the gateway HTTP server
    Serve {
        /// Host and port to listen to
        #[arg(short, long, default_value = "0.0.0.0:8080", value_hint = ValueHint::Hostname)]
        bind: String,
    },
}
