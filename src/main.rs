use anyhow::Result;
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use thumbnail_generator::config::Config;
use thumbnail_generator::download::download_thumbnails;
use thumbnail_generator::driver::JobDriver;
use thumbnail_generator::models::{find_style, GenerationRequest, STYLE_PRESETS};
use thumbnail_generator::provider::PredictionClient;
use thumbnail_generator::session::{Session, DEFAULT_NUM_OUTPUTS};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "thumbnail-generator")]
#[command(about = "Generate and refine AI video thumbnails")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate thumbnails, optionally refining one of them.
    Generate(GenerateArgs),
    /// List the available style presets.
    Styles,
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Text that must appear on the thumbnail.
    #[arg(value_name = "MAIN_TEXT")]
    main_text: String,

    /// Style preset id (see `styles`).
    #[arg(long)]
    style: Option<String>,

    /// Extra free-text direction for the image.
    #[arg(long)]
    context: Option<String>,

    /// Video URL whose style should inspire the thumbnail.
    #[arg(long)]
    reference_url: Option<String>,

    /// PNG or JPEG reference image (checked locally, not uploaded).
    #[arg(long, value_name = "PATH")]
    reference_image: Option<PathBuf>,

    /// Number of thumbnails to request.
    #[arg(long, default_value_t = DEFAULT_NUM_OUTPUTS, value_parser = clap::value_parser!(u32).range(1..))]
    count: u32,

    /// 1-based thumbnail to refine.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..), requires = "refine")]
    select: Option<u32>,

    /// Refinement instruction; repeat for several rounds.
    #[arg(long, requires = "select")]
    refine: Vec<String>,

    /// Save the final thumbnails locally.
    #[arg(long)]
    download: bool,

    /// Directory for downloads (defaults to output/<date>_<session>).
    #[arg(long, value_name = "DIR", requires = "download")]
    output_dir: Option<PathBuf>,
}

fn print_thumbnails(heading: &str, urls: &[String]) {
    println!("{}", heading);
    for (index, url) in urls.iter().enumerate() {
        println!("  {}. {}", index + 1, url);
    }
}

fn print_styles() {
    for preset in &STYLE_PRESETS {
        println!("{:<14} {} - {}", preset.id, preset.name, preset.description);
    }
}

async fn run_generate(args: GenerateArgs) -> thumbnail_generator::Result<()> {
    let config = Config::from_env()?;
    let client = PredictionClient::new(config.provider)?;
    let mut session =
        Session::new(JobDriver::new(Box::new(client), config.poll)).with_num_outputs(args.count);
    info!("Session {} started", session.id());

    let mut request = GenerationRequest::new(args.main_text);
    if let Some(style) = args.style {
        if find_style(&style).is_none() {
            warn!("Unknown style '{}', generating without a style preset", style);
        }
        request = request.with_style(style);
    }
    if let Some(context) = args.context {
        request = request.with_context(context);
    }
    if let Some(url) = args.reference_url {
        request = request.with_reference_url(url);
    }
    if let Some(path) = args.reference_image {
        request = request.with_reference_image(tokio::fs::read(&path).await?);
    }

    print_thumbnails("Thumbnails:", session.generate(request).await?);

    if let Some(select) = args.select {
        for note in &args.refine {
            session.select(select as usize - 1)?;
            print_thumbnails("Refined thumbnails:", session.refine(note).await?);
        }
    }

    if args.download {
        let dir = args.output_dir.unwrap_or_else(|| {
            let date = Local::now().format("%Y-%m-%d").to_string();
            PathBuf::from("output").join(format!("{}_{}", date, session.id()))
        });
        let saved =
            download_thumbnails(&reqwest::Client::new(), session.thumbnails(), &dir).await?;
        info!("Downloaded {} thumbnail(s) to {}", saved.len(), dir.display());
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "thumbnail_generator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    match args.command {
        Command::Styles => {
            print_styles();
            Ok(())
        }
        Command::Generate(generate) => match run_generate(generate).await {
            Ok(()) => {
                info!("Generation completed successfully");
                Ok(())
            }
            Err(e) => {
                error!("Generation failed: {}", e);
                std::process::exit(1);
            }
        },
    }
}
