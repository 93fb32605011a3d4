use argparse::{ArgumentParser, Collect, Store, StoreOption, StoreTrue};
use std::path::PathBuf;

pub struct CliArgs {
    pub input_files: Vec<PathBuf>,
    pub types: Vec<String>,
    pub transmissions: Vec<String>,
    pub hex_ids: Vec<String>,
    pub callsigns: Vec<String>,
    pub tz: Option<String>,
    pub format: String,
    pub strict: bool,
    pub log_level: String,
    pub out: Option<PathBuf>,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            input_files: vec![],
            types: vec![],
            transmissions: vec![],
            hex_ids: vec![],
            callsigns: vec![],
            tz: None,
            format: "json".into(),
            strict: false,
            log_level: "essential".into(),
            out: None,
        }
    }
}

pub fn parse_cli() -> CliArgs {
    let mut args = CliArgs::default();
    {
        let mut ap = ArgumentParser::new();
        ap.set_description("SBS-1 BaseStation feed decoder");
        ap.refer(&mut args.input_files)
            .add_argument("input_files", Collect, "Input files (default: stdin)");
        ap.refer(&mut args.types)
            .add_option(&["-t", "--type"], Collect, "Keep message type (SEL|ID|AIR|STA|CLK|MSG)");
        ap.refer(&mut args.transmissions)
            .add_option(&["--tx"], Collect, "Keep transmission type (1-8)");
        ap.refer(&mut args.hex_ids)
            .add_option(&["--hex"], Collect, "Keep aircraft hex id");
        ap.refer(&mut args.callsigns)
            .add_option(&["--callsign"], Collect, "Keep callsign");
        ap.refer(&mut args.tz)
            .add_option(&["--tz"], StoreOption, "Feed timestamps' IANA time zone (default UTC)");
        ap.refer(&mut args.format)
            .add_option(&["-f", "--format"], Store, "Output format: json|csv|debug");
        ap.refer(&mut args.strict)
            .add_option(&["--strict"], StoreTrue, "Stop at the first record that fails to decode");
        ap.refer(&mut args.log_level)
            .add_option(&["--log"], Store, "Log level (essential|debug|trace|warn|error)");
        ap.refer(&mut args.out)
            .add_option(&["--out"], StoreOption, "Output path (default: stdout)");
        ap.parse_args_or_exit();
    }
    args
}
