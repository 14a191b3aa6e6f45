use clap::{Args, Parser, Subcommand, ValueEnum};
use screenforge_ui::Breakpoint;
use screenforge_ui::library::TierRequest;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "screenforge",
    version,
    about = "Assemble, validate and lay out pattern-based screens"
)]
pub struct Cli {
    /// TOML configuration file. A missing file means defaults.
    #[arg(long, global = true, env = "SCREENFORGE_CONFIG", default_value = "screenforge.toml")]
    pub config: PathBuf,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a screen specification from a generation plan and a hero image.
    Assemble(AssembleArgs),
    /// Validate a screen specification document.
    Validate {
        /// Screen specification JSON.
        screen: PathBuf,
        /// Skip the pattern contract stage.
        #[arg(long)]
        schema_only: bool,
    },
    /// Resolve a pattern's layout and slot placements.
    Layout(LayoutArgs),
    /// Render a screen specification.
    Render(RenderArgs),
    /// List the patterns the configured source serves.
    Patterns,
    /// Print the JSON schema of screen specifications.
    Schema,
}

#[derive(Args, Debug)]
pub struct AssembleArgs {
    /// Generation plan JSON.
    #[arg(long)]
    pub plan: PathBuf,
    /// Resolved hero image JSON.
    #[arg(long, conflicts_with = "hero_url")]
    pub hero: Option<PathBuf>,
    /// Hero image URL, when no hero document is at hand.
    #[arg(long)]
    pub hero_url: Option<String>,
    /// Screen intent override JSON.
    #[arg(long = "override")]
    pub intent: Option<PathBuf>,
    /// Pattern as FAMILY/VARIANT. Defaults to the plan's pattern.
    #[arg(long)]
    pub pattern: Option<String>,
    /// Fail on missing required slots instead of repairing them.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct LayoutArgs {
    pub family: String,
    pub variant: u8,
    #[command(flatten)]
    pub viewport: ViewportArgs,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Screen specification JSON.
    pub screen: PathBuf,
    #[command(flatten)]
    pub viewport: ViewportArgs,
    #[arg(long, value_enum, default_value_t = TierArg::Default)]
    pub tier: TierArg,
    /// Screen type hint for renderer selection.
    #[arg(long)]
    pub screen_type: Option<String>,
    /// Print HTML instead of the render outcome as JSON.
    #[arg(long)]
    pub html: bool,
}

#[derive(Args, Debug)]
pub struct ViewportArgs {
    #[arg(long, value_enum, conflicts_with = "width")]
    pub breakpoint: Option<BreakpointArg>,
    /// Viewport width in pixels, mapped through the configured thresholds.
    #[arg(long)]
    pub width: Option<u32>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BreakpointArg {
    Mobile,
    Tablet,
    Desktop,
}

impl From<BreakpointArg> for Breakpoint {
    fn from(value: BreakpointArg) -> Self {
        match value {
            BreakpointArg::Mobile => Breakpoint::Mobile,
            BreakpointArg::Tablet => Breakpoint::Tablet,
            BreakpointArg::Desktop => Breakpoint::Desktop,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TierArg {
    Default,
    Enhanced,
    EnhancedOnly,
}

impl From<TierArg> for TierRequest {
    fn from(value: TierArg) -> Self {
        match value {
            TierArg::Default => TierRequest::Default,
            TierArg::Enhanced => TierRequest::Enhanced,
            TierArg::EnhancedOnly => TierRequest::EnhancedOnly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_assemble() {
        let cli = Cli::try_parse_from([
            "screenforge",
            "assemble",
            "--plan",
            "plan.json",
            "--hero-url",
            "https://cdn.example.com/a.png",
            "--pattern",
            "CTA_CENTER/1",
        ])
        .unwrap();
        let Commands::Assemble(args) = cli.command else { panic!("expected assemble") };
        assert_eq!(args.pattern.as_deref(), Some("CTA_CENTER/1"));
        assert!(args.hero.is_none());
        assert!(!args.strict);
    }

    #[test]
    fn hero_file_and_url_conflict() {
        let err = Cli::try_parse_from([
            "screenforge",
            "assemble",
            "--plan",
            "p.json",
            "--hero",
            "h.json",
            "--hero-url",
            "https://x/y.png",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn parses_layout_with_width() {
        let argv = ["screenforge", "layout", "CTA_CENTER", "1", "--width", "900"];
        let cli = Cli::try_parse_from(argv).unwrap();
        let Commands::Layout(args) = cli.command else { panic!("expected layout") };
        assert_eq!(args.variant, 1);
        assert_eq!(args.viewport.width, Some(900));
    }

    #[test]
    fn parses_render_tier() {
        let cli = Cli::try_parse_from([
            "screenforge",
            "render",
            "s.json",
            "--breakpoint",
            "tablet",
            "--tier",
            "enhanced-only",
            "--html",
        ])
        .unwrap();
        let Commands::Render(args) = cli.command else { panic!("expected render") };
        assert_eq!(args.tier, TierArg::EnhancedOnly);
        assert_eq!(args.viewport.breakpoint, Some(BreakpointArg::Tablet));
        assert!(args.html);
    }
}
