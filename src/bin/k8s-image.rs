use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use k8s_image::{
    config::{Config, DEFAULT_MIRROR},
    engine::DockerEngine,
    relay::{self, Operation},
};
use std::{env, io};

/// Relay container images to a private registry through a Docker Hub mirror
///
/// `push` and `redirect` read the login of the private registry
/// from DOCKER_USERNAME and DOCKER_PASSWORD.
#[derive(Debug, Parser)]
#[clap(version)]
struct Opt {
    /// Docker Hub namespace mirroring gcr.io, k8s.gcr.io, registry.k8s.io and ghcr.io
    #[clap(long, global = true, env = "K8S_IMAGE_MIRROR", default_value = DEFAULT_MIRROR)]
    mirror: String,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print version
    Version,

    /// Pull image from public registry
    Pull {
        /// e.g. gcr.io/google_containers/kube-apiserver-amd64:v1.9.0
        image: String,
    },

    /// Push local image to private registry
    Push {
        image: String,
        /// Private registry as `<ip:port>`
        address: String,
    },

    /// Pull image from public registry and push it to private registry
    Redirect {
        image: String,
        /// Private registry as `<ip:port>`
        address: String,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let opt = match Opt::try_parse() {
        Ok(opt) => opt,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                Opt::command().print_help()?;
                return Ok(());
            }
        },
    };
    log::debug!("{:?}", opt);

    let operation = match opt.command {
        Command::Version => {
            println!("v{}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Command::Pull { image } => Operation::Pull { image },
        Command::Push { image, address } => Operation::Push { image, address },
        Command::Redirect { image, address } => Operation::Redirect { image, address },
    };
    relay::run(
        &operation,
        Config { mirror: opt.mirror },
        |key| env::var(key).ok(),
        DockerEngine::connect,
        io::stdout(),
    )?;
    Ok(())
}
