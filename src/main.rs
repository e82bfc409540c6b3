use clap::Parser;
use color_eyre::Result;
use futures::StreamExt;
use smartparallel::{
    cli::{Cli, Commands},
    logging,
    serial::{
        codec::FrameCodec,
        port::{Connection, PortConfig},
        SerialMessage,
    },
};
use tokio_serial::SerialPortBuilderExt;
use tokio_util::codec::Decoder;
use tracing::{error, info, Level};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let Cli {
        device,
        baud,
        log_dir,
        verbose,
        command,
    } = Cli::parse();

    let stdout_level = if verbose { Level::DEBUG } else { Level::INFO };
    logging::init(stdout_level, log_dir.map(|dir| (Level::DEBUG, dir)));

    match command {
        Commands::Listen => listen(&device, baud).await?,
        Commands::Send { lines } => {
            let mut connection = open(&device, baud)?;
            for line in &lines {
                connection.write_line(line)?;
            }
            connection.flush()?;
        }
        Commands::Command { name } => {
            let mut connection = open(&device, baud)?;
            connection.write_command(name.into())?;
            connection.flush()?;
        }
        Commands::Init => {
            let mut connection = open(&device, baud)?;
            connection.init_printer()?;
            connection.set_tabs()?;
            connection.flush()?;
        }
    }

    Ok(())
}

fn open(device: &str, baud: u32) -> Result<Connection> {
    Ok(Connection::open(PortConfig::new(device).baud(baud))?)
}

async fn listen(device: &str, baud: u32) -> Result<()> {
    let stream = tokio_serial::new(device, baud).open_native_async()?;
    let mut frames = FrameCodec::default().framed(stream);

    info!(%device, %baud, "Listening; ctrl-c to stop");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl-C, quitting");
                break;
            }
            frame = frames.next() => {
                match frame {
                    Some(Ok(bytes)) => println!("{}", SerialMessage::new_lossy(&bytes).as_str()),
                    Some(Err(e)) => {
                        error!(?e, "Stream error, quitting");
                        break;
                    }
                    None => {
                        info!("Stream ended");
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}
