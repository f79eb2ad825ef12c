use clap::{Parser, Subcommand};

use terminus_hotfix::commands::{env, CmdResult};
use terminus_hotfix::output;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "terminus-hotfix")]
#[command(version = VERSION)]
#[command(about = "Hotfix release workflows for Pantheon sites")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Environment operations
    Env(env::EnvArgs),
}

fn run(command: Commands) -> CmdResult<serde_json::Value> {
    match command {
        Commands::Env(args) => env::run(args),
    }
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let (json_result, exit_code) = output::map_cmd_result_to_json(run(cli.command));
    output::print_json_result(json_result).ok();

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
