use std::path::PathBuf;

use anyhow::Context as _;
use badgeforge::DownloadSink as _;
use clap::{Parser, Subcommand};
use sha2::Digest as _;

#[derive(Parser, Debug)]
#[command(name = "badgeforge", version)]
struct Cli {
    /// Log pipeline steps at DEBUG level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a badge PNG.
    Render(RenderArgs),
    /// Print the built-in template layouts as JSON.
    Templates,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Built-in preset name or path to a template JSON file.
    #[arg(long)]
    template: String,

    /// Template image. Required with a preset, overrides the JSON file's asset otherwise.
    #[arg(long)]
    template_image: Option<PathBuf>,

    /// Name line.
    #[arg(long)]
    name: String,

    /// Role line.
    #[arg(long)]
    role: String,

    /// Portrait for the circular slot.
    #[arg(long)]
    photo: Option<PathBuf>,

    /// Output directory; the file is named after `--name`.
    #[arg(long)]
    out: PathBuf,

    /// Fail instead of rendering without the photo when it cannot be decoded.
    #[arg(long)]
    strict_photo: bool,

    /// Print a prefilled social post link after rendering.
    #[arg(long)]
    print_share_link: bool,

    /// Link attached to the social post.
    #[arg(long)]
    link: Option<String>,

    /// Print which font files the name and role resolve to (family + SHA-256 of font bytes).
    #[arg(long)]
    dump_fonts: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Templates => cmd_templates(),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let asset = args.template_image.as_ref().map(badgeforge::ImageSource::from_path);
    let template = badgeforge::Template::from_arg(&args.template, asset)
        .with_context(|| format!("load template '{}'", args.template))?;

    let mut opts = badgeforge::CompositorOpts::from_env();
    if args.strict_photo {
        opts = opts.strict();
    }
    let compositor = badgeforge::Compositor::with_opts(opts);

    if args.dump_fonts {
        dump_font_diagnostics(&compositor, &template)?;
    }

    let mut request = badgeforge::BadgeRequest::new(&args.name, &args.role);
    if let Some(photo) = &args.photo {
        request = request.with_photo(badgeforge::ImageSource::from_path(photo));
    }

    let badge = compositor.render(&template, &request)?;

    let mut downloads = badgeforge::DirectoryDownloads::new(&args.out);
    let path = downloads.save(&badgeforge::download_file_name(&args.name), &badge.png)?;
    println!("{}", path.display());

    if args.print_share_link {
        let cfg = badgeforge::ShareConfig {
            link: args.link.clone(),
            ..badgeforge::ShareConfig::default()
        };
        let url = badgeforge::SocialPost::from_config(&cfg).intent_url()?;
        println!("{url}");
    }
    Ok(())
}

fn cmd_templates() -> anyhow::Result<()> {
    let mut presets = serde_json::Map::new();
    for name in badgeforge::PRESET_NAMES {
        let layout = badgeforge::TemplateLayout::preset(name)
            .with_context(|| format!("preset '{name}' is listed but missing"))?;
        presets.insert(
            (*name).to_string(),
            serde_json::to_value(layout).context("serialize preset")?,
        );
    }
    println!(
        "{}",
        serde_json::to_string_pretty(&presets).context("serialize presets")?
    );
    Ok(())
}

fn dump_font_diagnostics(
    compositor: &badgeforge::Compositor,
    template: &badgeforge::Template,
) -> anyhow::Result<()> {
    eprintln!("text font diagnostics:");
    eprintln!("- faces visible: {}", compositor.fonts().face_count());
    for (label, style) in [("name", &template.layout.name), ("role", &template.layout.role)] {
        let font = compositor
            .fonts()
            .resolve(&style.font)
            .with_context(|| format!("resolve {label} font"))?;
        let digest = sha2::Sha256::digest(font.bytes.as_slice());
        eprintln!(
            "- {label}: requested='{}' weight={} italic={} resolved={:?} index={} sha256={digest:x}",
            style.font.family, style.font.weight, style.font.italic, font.family, font.index
        );
    }
    Ok(())
}
