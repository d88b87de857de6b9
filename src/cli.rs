use clap::{Parser, Subcommand, ValueEnum};

/// Timetable service for the Sedna scheduling portal.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Log output format
    #[arg(long, value_enum, default_value_t = TracingFormat::default())]
    pub tracing: TracingFormat,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Print the next hierarchy level below the deepest id given
    Browse {
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        school: Option<String>,
        #[arg(long)]
        semester: Option<String>,
        #[arg(long)]
        class: Option<String>,
    },
    /// Print the events of one subclass
    Schedule {
        #[arg(long)]
        subclass: String,
        /// Day window; defaults to DEFAULT_DAY_WINDOW
        #[arg(long)]
        days: Option<u32>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TracingFormat {
    Pretty,
    Json,
}

impl Default for TracingFormat {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_serve() {
        let args = Args::try_parse_from(["timetable"]).unwrap();
        assert_eq!(args.command, None);
    }

    #[test]
    fn test_browse_ids() {
        let args = Args::try_parse_from([
            "timetable",
            "--tracing",
            "json",
            "browse",
            "--department",
            "6976",
            "--school",
            "12",
        ])
        .unwrap();
        assert_eq!(args.tracing, TracingFormat::Json);
        assert_eq!(
            args.command,
            Some(Command::Browse {
                department: Some("6976".into()),
                school: Some("12".into()),
                semester: None,
                class: None,
            })
        );
    }

    #[test]
    fn test_schedule_requires_subclass() {
        assert!(Args::try_parse_from(["timetable", "schedule"]).is_err());
        let args =
            Args::try_parse_from(["timetable", "schedule", "--subclass", "4242", "--days", "14"])
                .unwrap();
        assert_eq!(
            args.command,
            Some(Command::Schedule {
                subclass: "4242".into(),
                days: Some(14),
            })
        );
    }
}
