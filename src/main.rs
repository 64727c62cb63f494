use anyhow::{anyhow, Context, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use spacetraveling::build::build_site;
use spacetraveling::config::Config;
use spacetraveling::source::DumpSource;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let matches = App::new("spacetraveling")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Builds the page data for a CMS-backed blog")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("build")
                .about("Writes the listing, post routes and post pages as JSON")
                .arg(
                    Arg::with_name("project")
                        .long("project")
                        .takes_value(true)
                        .help("Directory to search (upward) for blog.yaml [default: .]"),
                )
                .arg(
                    Arg::with_name("output")
                        .short("o")
                        .long("output")
                        .takes_value(true)
                        .help("Output directory [default: {project}/_site]"),
                )
                .arg(
                    Arg::with_name("content")
                        .long("content")
                        .takes_value(true)
                        .help("CMS export directory, overriding blog.yaml"),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        ("build", Some(matches)) => build(matches),
        (name, _) => Err(anyhow!("unknown subcommand `{}`", name)),
    }
}

fn build(matches: &ArgMatches) -> Result<()> {
    let project = Path::new(matches.value_of("project").unwrap_or("."))
        .canonicalize()
        .context("resolving the project directory")?;
    let output = match matches.value_of("output") {
        Some(output) => PathBuf::from(output),
        None => project.join("_site"),
    };

    let mut config = Config::from_directory(&project, &output)?;
    if let Some(content) = matches.value_of("content") {
        config.content_directory = PathBuf::from(content);
    }

    let source = DumpSource::load(&config.content_directory).with_context(|| {
        format!(
            "loading content from `{}`",
            config.content_directory.display()
        )
    })?;
    info!(
        documents = source.len(),
        content = %config.content_directory.display(),
        "loaded content"
    );

    build_site(&config, &source)?;
    info!(output = %config.output_directory.display(), "build complete");
    Ok(())
}
