use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{PossibleValuesParser, TypedValueParser},
};
use std::{fmt::Display, io::Write, process::ExitCode};
use tracing::{debug, error, warn};
use wunder_core::{
    App, CacheStore, CliCredentials, Command as CoreCommand, Config, CurrentField, FORECAST_DAYS,
    ForecastField, InfoField, Outcome, Query, WeatherError, WundergroundSource,
};

const ABOUT: &str = "wunder pulls weather data from Weather Underground's API.\n\n\
You must first fetch the data using the fetch command. This stores a file in the \
temp directory that contains the data. All other commands (current, forecast, and info) \
read from this file.";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "wunder", version, about = ABOUT, long_about = None)]
pub struct Cli {
    /// Display additional information on stderr (use this if you are expecting output but
    /// receive none).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Requires config file. Fetch new information before printing a field if the cache
    /// file is older than the given minutes (no effect with `wunder fetch`). Zero or a
    /// negative value disables this.
    #[arg(
        short = 'f',
        long = "fetch",
        value_name = "MIN",
        global = true,
        allow_negative_numbers = true
    )]
    pub refresh_minutes: Option<i64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch data into the cache file.
    Fetch {
        /// Fetch data with the given API key.
        apikey: Option<String>,
        /// Fetch data for the given location.
        location: Option<String>,
        /// Fetch data in the given language.
        language: Option<String>,
    },

    /// Display a current condition.
    Current {
        #[arg(value_parser = PossibleValuesParser::new(CurrentField::all().iter().map(|f| f.as_str()))
            .try_map(|s| s.parse::<CurrentField>()))]
        field: CurrentField,
    },

    /// Display a forecast statistic.
    Forecast {
        #[arg(value_parser = PossibleValuesParser::new(ForecastField::all().iter().map(|f| f.as_str()))
            .try_map(|s| s.parse::<ForecastField>()))]
        field: ForecastField,

        /// Day to display forecast information from. Default is 0 (today).
        #[arg(short, long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..FORECAST_DAYS as i64))]
        day: u8,
    },

    /// Display information about the data feed.
    Info {
        #[arg(value_parser = PossibleValuesParser::new(InfoField::all().iter().map(|f| f.as_str()))
            .try_map(|s| s.parse::<InfoField>()))]
        field: InfoField,
    },
}

impl From<Command> for CoreCommand {
    fn from(command: Command) -> Self {
        match command {
            Command::Fetch { apikey, location, language } => {
                CoreCommand::Fetch(CliCredentials { api_key: apikey, location, language })
            }
            Command::Current { field } => CoreCommand::Show(Query::Current(field)),
            Command::Forecast { field, day } => {
                CoreCommand::Show(Query::Forecast { field, day: usize::from(day) })
            }
            Command::Info { field } => CoreCommand::Show(Query::Info(field)),
        }
    }
}

impl Cli {
    /// Refresh threshold handed to the core; only a positive number of minutes enables it.
    pub fn refresh_threshold(&self) -> Option<u64> {
        self.refresh_minutes
            .and_then(|m| u64::try_from(m).ok())
            .filter(|m| *m > 0)
    }

    /// Run the parsed command. Stdout only ever carries the requested value, the API's
    /// error description, or the usage line.
    pub async fn run(self) -> ExitCode {
        let refresh = self.refresh_threshold();
        let mut stdout = std::io::stdout().lock();

        let Some(command) = self.command else {
            return ExitCode::from(print_usage(&mut stdout));
        };

        let config = Config::load().unwrap_or_else(|err| {
            warn!("Ignoring config file: {err:#}");
            None
        });

        let app = App::new(WundergroundSource::new(), CacheStore::default(), config);
        debug!(cache = %app.cache().path().display(), "Using cache file");

        let result = app.run(command.into(), refresh).await;
        ExitCode::from(report(result, &mut stdout))
    }
}

fn emit(out: &mut impl Write, line: impl Display) {
    if let Err(err) = writeln!(out, "{line}") {
        error!("Failed to write to stdout: {err}");
    }
}

fn print_usage(out: &mut impl Write) -> u8 {
    emit(out, Cli::command().render_usage());
    0
}

/// Print what the status bar should see and return the process exit status.
fn report(result: Result<Outcome, WeatherError>, out: &mut impl Write) -> u8 {
    match result {
        Ok(Outcome::Fetched) => 0,
        Ok(Outcome::Value(value)) => {
            emit(out, value);
            0
        }
        Err(err) => {
            if let WeatherError::Api(description) = &err {
                emit(out, description);
            }
            error!("{err}");
            err.exit_code()
        }
    }
}
