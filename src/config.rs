//! Configuration and CLI argument handling

use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "quiz-timer")]
#[command(about = "Quiz countdown timer with a local hosting service")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Default quiz time limit in minutes; quizzes run untimed when omitted
    #[arg(short, long)]
    pub duration: Option<u32>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Default quiz time limit in seconds
    pub fn default_duration_seconds(&self) -> Option<i64> {
        self.duration.map(|minutes| i64::from(minutes) * 60)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::Config;

    #[test]
    fn defaults() {
        let config = Config::parse_from(["quiz-timer"]);
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.default_duration_seconds(), None);
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn duration_is_minutes() {
        let config = Config::parse_from(["quiz-timer", "--duration", "45", "-v"]);
        assert_eq!(config.default_duration_seconds(), Some(2700));
        assert_eq!(config.log_level(), "debug");
    }
}
