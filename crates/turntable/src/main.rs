use clap::Parser;
use relm4::prelude::*;
use std::io::Write;
use std::os::unix::net::UnixStream;
use turntable::config;
use turntable::events::Command;
use turntable::gui::app::AppModel;
use turntable::sys::runtime;
use turntable::sys::server::SOCKET_PATH;

#[derive(Parser, Debug)]
#[command(name = "turntable", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Write the default config.toml (if missing) and print its path
    #[arg(long)]
    write_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.write_config {
        let path = config::write_default_config()?;
        println!("{}", path.display());
        return Ok(());
    }

    match cli.command {
        Some(command) => send_command(command),
        None => {
            run();
            Ok(())
        }
    }
}

fn run() {
    let settings = config::load_or_default();

    let (tx, rx) = async_channel::bounded(32);

    runtime::start_background_services(tx, settings.assets_dir());

    let app = RelmApp::new("org.musicdisk.turntable");

    app.run::<AppModel>((settings, rx));
}

fn send_command(command: Command) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(SOCKET_PATH).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to turntable at {}: {}. Is it running?",
            SOCKET_PATH,
            e
        )
    })?;

    writeln!(stream, "{}", command)?;
    Ok(())
}
