use anyhow::Context;
use clap::Parser;
use isopod::cli::{
    Args, Commands, ConfigDiscovery, ConsoleTerminal, ContainerCommand, ImageCommand, LogCommand,
    NetworkCommand, PodCommand, SystemCommand, VolumeCommand, render_outcome, render_table,
};
use isopod::executor::ExecutionResult;
use isopod::managers::{EngineContext, ProbeOutcome, error_chain};
use isopod::normalize::NormalizedTable;
use std::process::ExitCode;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "isopod=debug"
    } else {
        "isopod=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<ExitCode> {
    if let Commands::ShowConfig { init } = args.command {
        if init {
            let path = ConfigDiscovery::create_default_user_config()?;
            println!("Default configuration: {}", path.display());
        }
        ConfigDiscovery::show_discovery_info();
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = ConfigDiscovery::load(args.config.as_deref())?;
    args.apply_overrides(&mut config);
    debug!("Effective configuration: {:?}", config);

    let context = EngineContext::from_config(&config)
        .await
        .context("Failed to prepare the engine context")?;

    if context.builder().root().is_some() {
        context.system().inspect_security();
    }

    if needs_engine(&args.command) {
        match context.system().prepare_root().await {
            Ok(Some(ProbeOutcome::Recovered)) => info!("Recovered stale runtime state"),
            Ok(_) => {}
            Err(e) => warn!("Startup check of the isolated root failed: {}", error_chain(&e)),
        }
    }

    match args.command {
        Commands::Container(command) => container(&context, command).await,
        Commands::Image(command) => image(&context, command).await,
        Commands::Pod(command) => pod(&context, command).await,
        Commands::Network(command) => network(&context, command).await,
        Commands::Volume(command) => volume(&context, command).await,
        Commands::Log(command) => log(&context, command).await,
        Commands::System(command) => system(&context, command).await,
        Commands::ShowConfig { .. } => Ok(ExitCode::SUCCESS),
    }
}

/// Log and system commands work without a healthy engine.
fn needs_engine(command: &Commands) -> bool {
    !matches!(
        command,
        Commands::Log(_) | Commands::System(_) | Commands::ShowConfig { .. }
    )
}

fn listing(table: NormalizedTable) -> anyhow::Result<ExitCode> {
    print!("{}", render_table(&table));
    Ok(ExitCode::SUCCESS)
}

fn outcome(action: &str, target: &str, result: ExecutionResult) -> anyhow::Result<ExitCode> {
    let line = render_outcome(action, target, &result);
    if result.success() {
        println!("{}", line);
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!("{}", line);
        Ok(ExitCode::FAILURE)
    }
}

async fn container(context: &EngineContext, command: ContainerCommand) -> anyhow::Result<ExitCode> {
    let containers = context.containers();
    match command {
        ContainerCommand::List => listing(containers.list().await?),
        ContainerCommand::Create(create) => {
            let request = create.to_request();
            outcome("create", &create.name, containers.create(request).await?)
        }
        ContainerCommand::Start { name } => outcome("start", &name, containers.start(&name).await?),
        ContainerCommand::Stop { name } => outcome("stop", &name, containers.stop(&name).await?),
        ContainerCommand::Restart { name } => {
            outcome("restart", &name, containers.restart(&name).await?)
        }
        ContainerCommand::Remove { name } => {
            outcome("remove", &name, containers.remove(&name).await?)
        }
        ContainerCommand::Attach { name } => {
            containers.attach(&name, &mut ConsoleTerminal).await?;
            Ok(ExitCode::SUCCESS)
        }
        ContainerCommand::Exec { name, command } => {
            containers.exec(&name, command, &mut ConsoleTerminal).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn image(context: &EngineContext, command: ImageCommand) -> anyhow::Result<ExitCode> {
    let images = context.images();
    match command {
        ImageCommand::List => listing(images.list().await?),
        ImageCommand::Pull { image, source, tag } => {
            let reference =
                ImageCommand::pull_reference(&image, source.as_deref(), tag.as_deref());
            outcome("pull", &reference, images.pull(&reference).await?)
        }
        ImageCommand::Build {
            context: build_context,
            name,
            tag,
        } => {
            let target = format!("{}:{}", name, tag);
            outcome("build", &target, images.build(&build_context, &name, &tag).await?)
        }
        ImageCommand::Remove { id } => outcome("remove", &id, images.remove(&id).await?),
    }
}

async fn pod(context: &EngineContext, command: PodCommand) -> anyhow::Result<ExitCode> {
    let pods = context.pods();
    match command {
        PodCommand::List => listing(pods.list().await?),
        PodCommand::Create { name, network } => outcome(
            "create",
            &name,
            pods.create(&name, network.as_deref()).await?,
        ),
        PodCommand::Start { name } => outcome("start", &name, pods.start(&name).await?),
        PodCommand::Stop { name } => outcome("stop", &name, pods.stop(&name).await?),
        PodCommand::Remove { name } => outcome("remove", &name, pods.remove(&name).await?),
    }
}

async fn network(context: &EngineContext, command: NetworkCommand) -> anyhow::Result<ExitCode> {
    let networks = context.networks();
    match command {
        NetworkCommand::List => listing(networks.list().await?),
        NetworkCommand::Create { name, subnet } => outcome(
            "create",
            &name,
            networks.create(&name, subnet.as_deref()).await?,
        ),
        NetworkCommand::Remove { name } => outcome("remove", &name, networks.remove(&name).await?),
    }
}

async fn volume(context: &EngineContext, command: VolumeCommand) -> anyhow::Result<ExitCode> {
    let volumes = context.volumes();
    match command {
        VolumeCommand::List => listing(volumes.list().await?),
        VolumeCommand::Create { name } => outcome("create", &name, volumes.create(&name).await?),
        VolumeCommand::Remove { name } => outcome("remove", &name, volumes.remove(&name).await?),
    }
}

async fn log(context: &EngineContext, command: LogCommand) -> anyhow::Result<ExitCode> {
    match command {
        LogCommand::Show => {
            for entry in context.log().read().await {
                println!("{}", entry);
            }
        }
        LogCommand::Clear => {
            context
                .log()
                .clear()
                .await
                .context("Failed to clear the operation log")?;
            info!("Operation log cleared");
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn system(context: &EngineContext, command: SystemCommand) -> anyhow::Result<ExitCode> {
    let system = context.system();
    match command {
        SystemCommand::Check => match system.engine_path() {
            Some(path) => {
                println!("{} found at {}", context.builder().program(), path.display());
                Ok(ExitCode::SUCCESS)
            }
            None => {
                eprintln!("{} not found on PATH", context.builder().program());
                Ok(ExitCode::FAILURE)
            }
        },
        SystemCommand::Recover => match system.probe_and_recover().await? {
            ProbeOutcome::Healthy => {
                println!("Engine healthy");
                Ok(ExitCode::SUCCESS)
            }
            ProbeOutcome::Recovered => {
                println!("Stale runtime state removed");
                Ok(ExitCode::SUCCESS)
            }
            ProbeOutcome::Failed { exit_code } => {
                eprintln!("Engine probe failed with exit code {}", exit_code);
                Ok(ExitCode::FAILURE)
            }
        },
        SystemCommand::Security => match system.inspect_security() {
            Some(report) => {
                println!("writable: {}", report.writable);
                println!("selinux label: {}", report.mac_labelled);
                Ok(ExitCode::SUCCESS)
            }
            None => {
                println!("No isolated root configured");
                Ok(ExitCode::SUCCESS)
            }
        },
    }
}
