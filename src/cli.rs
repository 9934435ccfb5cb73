use clap::builder::styling::AnsiColor;
use clap::builder::Styles;
use clap::Parser;

const fn extra_build_info() -> &'static str {
    match option_env!("CARGO_BUILD_DESC") {
        Some(e) => e,
        None => env!("CARGO_PKG_VERSION"),
    }
}
pub const VERSION: &str = extra_build_info();
const INFO_STRING: &str = "
🧬 taxmerge version ";
const AFTER_STRING: &str = "
   ──────────────────────────────────
   last common ancestor consensus calls for amplicon hit tables";

// colouring of the help
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().bold())
    .usage(AnsiColor::BrightMagenta.on_default().bold())
    .literal(AnsiColor::BrightMagenta.on_default())
    .placeholder(AnsiColor::White.on_default());

#[derive(Parser)]
#[command(
    version = VERSION,
    about = format!("{}{}{}", INFO_STRING, VERSION, AFTER_STRING),
    arg_required_else_help = true,
    styles = STYLES
)]
pub struct Cli {
    /// directory containing the `hits.*` tables; a `results.*` table is
    /// written next to each of them
    pub directory: String,

    /// abort when records within one amplicon group disagree on abundance or
    /// identity, instead of silently keeping the first-seen values
    #[arg(long, action)]
    pub strict_groups: bool,
}
