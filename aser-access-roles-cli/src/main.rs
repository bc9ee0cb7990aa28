use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use aser_access_roles_core::{
    AccessRolesConfig, AccessRolesService, DeploymentContext, DeploymentTemplate, StaticSource,
};
use clap::{ArgAction, Args, Parser, Subcommand};
use log::{debug, info};

#[derive(Parser)]
#[command(
    name = "aser-access-roles",
    version,
    about = "Generate cross-account IAM access roles for exported stack resources and export the deployed role manifest."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct DeploymentArgs {
    /// JSON configuration with principalAccountId, principalRoleName, externalId and optional exportPrefix, outDir, outFilename
    #[arg(long, env = "ASER_CONFIG", default_value = "aser-access-roles.json")]
    config: PathBuf,

    /// Service name; the deployed stack is <service>-<stage>
    #[arg(long, env = "ASER_SERVICE")]
    service: String,

    /// Deployment stage
    #[arg(long, env = "ASER_STAGE", default_value = "dev")]
    stage: String,

    /// AWS region (defaults to the provider chain's region)
    #[arg(long, env = "AWS_REGION")]
    region: Option<String>,

    /// Service root directory; the manifest is written relative to it
    #[arg(long, default_value = ".")]
    service_dir: PathBuf,

    /// Read exports from a JSON file instead of calling CloudFormation
    #[arg(long)]
    exports_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add access roles for discovered exports to a CloudFormation template
    Generate {
        #[command(flatten)]
        deployment: DeploymentArgs,

        /// CloudFormation template (JSON) to extend
        #[arg(long)]
        template: PathBuf,

        /// Write the extended template here instead of in place
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the access roles and outputs that would be generated
    Plan {
        #[command(flatten)]
        deployment: DeploymentArgs,
    },
    /// Resolve deployed role ARNs and write the service outputs manifest
    Export {
        #[command(flatten)]
        deployment: DeploymentArgs,

        /// Read deployed stack outputs from a JSON file instead of calling CloudFormation.
        /// Requires --exports-file.
        #[arg(long, requires = "exports_file")]
        outputs_file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Generate {
            deployment,
            template,
            output,
        } => generate(&deployment, &template, output.as_deref()).await,
        Commands::Plan { deployment } => plan(&deployment).await,
        Commands::Export {
            deployment,
            outputs_file,
        } => export(&deployment, outputs_file.as_deref()).await,
    }
}

async fn build_service(
    args: &DeploymentArgs,
    outputs_file: Option<&Path>,
) -> Result<AccessRolesService> {
    let config = AccessRolesConfig::load(&args.config)
        .await
        .with_context(|| format!("Failed to load configuration from {}", args.config.display()))?;
    let context = DeploymentContext {
        service: args.service.clone(),
        stage: args.stage.clone(),
        region: args.region.clone(),
        service_dir: args.service_dir.clone(),
    };
    debug!("Deployment context: {:?}", context);

    let Some(exports_file) = &args.exports_file else {
        return Ok(AccessRolesService::with_cloudformation(config, context).await);
    };

    info!("Using exports from {}", exports_file.display());
    let mut source = StaticSource::new().with_exports(StaticSource::load_exports(exports_file).await?);
    if let Some(outputs_file) = outputs_file {
        info!("Using stack outputs from {}", outputs_file.display());
        source = source.with_outputs(StaticSource::load_outputs(outputs_file).await?);
    }
    Ok(AccessRolesService::new(config, context, Box::new(source)))
}

async fn generate(args: &DeploymentArgs, template_path: &Path, output: Option<&Path>) -> Result<()> {
    let content = tokio::fs::read_to_string(template_path)
        .await
        .with_context(|| format!("Failed to read template {}", template_path.display()))?;
    let mut template: DeploymentTemplate = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse template {}", template_path.display()))?;

    let mut service = build_service(args, None).await?;
    service.discover().await.context("Failed to discover exports")?;
    let generated = service
        .generate_into(&mut template)
        .context("Failed to generate access roles")?;

    let destination = output.unwrap_or(template_path);
    let json = serde_json::to_string_pretty(&template)?;
    tokio::fs::write(destination, json)
        .await
        .with_context(|| format!("Failed to write template {}", destination.display()))?;

    println!(
        "Added {} access roles to {}",
        generated.resources.len(),
        destination.display()
    );
    Ok(())
}

async fn plan(args: &DeploymentArgs) -> Result<()> {
    let mut service = build_service(args, None).await?;
    service.discover().await.context("Failed to discover exports")?;
    let generated = service.generate().context("Failed to generate access roles")?;

    println!("{}", serde_json::to_string_pretty(&generated)?);
    Ok(())
}

async fn export(args: &DeploymentArgs, outputs_file: Option<&Path>) -> Result<()> {
    let mut service = build_service(args, outputs_file).await?;
    service.discover().await.context("Failed to discover exports")?;
    // Output keys are deterministic, so regenerating restores them for resolution.
    service.generate().context("Failed to generate access roles")?;
    let summary = service.export().await.context("Failed to export service outputs")?;

    println!(
        "Wrote {} access roles to {}",
        summary.manifest.len(),
        summary.path.display()
    );
    Ok(())
}
