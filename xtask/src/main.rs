use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for showreel")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: fmt, clippy, tests, deny, doc
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates
    Clippy,
    /// Run all tests
    Test,
    /// Run cargo deny check
    Deny,
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
    /// Play the default presentation headless with one scroll after the intro
    Demo {
        /// Number of frames to run
        #[arg(short, long, default_value = "360")]
        frames: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            for step in [Step::Fmt, Step::Clippy, Step::Test, Step::Deny, Step::Doc] {
                step.run()?;
            }
        }
        Commands::Fmt => Step::Fmt.run()?,
        Commands::Clippy => Step::Clippy.run()?,
        Commands::Test => Step::Test.run()?,
        Commands::Deny => Step::Deny.run()?,
        Commands::Doc => Step::Doc.run()?,
        Commands::Build => Step::Build.run()?,
        Commands::Demo { frames } => {
            let frames = frames.to_string();
            cargo(
                "showreel demo",
                &[
                    "run", "-p", "showreel-cli", "--", "play", "--frames", &frames,
                    "--scroll-at", "2000",
                ],
            )?;
        }
    }

    Ok(())
}

#[derive(Clone, Copy)]
enum Step {
    Fmt,
    Clippy,
    Test,
    Deny,
    Doc,
    Build,
}

impl Step {
    fn run(self) -> Result<()> {
        match self {
            Step::Fmt => cargo("cargo fmt --check", &["fmt", "--all", "--", "--check"]),
            Step::Clippy => cargo(
                "cargo clippy",
                &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
            ),
            Step::Test => cargo("cargo test", &["test", "--workspace"]),
            Step::Deny => cargo(
                "cargo deny check (licenses bans sources)",
                &["deny", "check", "licenses", "bans", "sources"],
            ),
            Step::Doc => cargo("cargo doc", &["doc", "--workspace", "--no-deps"]),
            Step::Build => cargo("cargo build", &["build", "--workspace"]),
        }
    }
}

fn cargo(label: &str, args: &[&str]) -> Result<()> {
    println!("==> Running {label}");
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("{label} failed");
    }
    Ok(())
}
