//! Intent classification
//!
//! Commands are matched against an ordered rule table where the first match
//! wins. Text that is not a command falls back to keyword detection and
//! finally to [`Intent::FreeText`].

use regex::{Captures, Regex};
use relaybot_types::{IncomingMessage, Intent};

/// City used when a weather request does not name one
pub const DEFAULT_CITY: &str = "Montreal";

/// Substrings that turn free text into a weather request
const WEATHER_KEYWORDS: &[&str] = &["погода", "weather", "температура"];

/// One command pattern and the intent it produces
struct CommandRule {
    name: &'static str,
    pattern: Regex,
    build: fn(&Captures<'_>) -> Intent,
}

impl CommandRule {
    fn new(
        name: &'static str,
        pattern: &str,
        build: fn(&Captures<'_>) -> Intent,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            pattern: Regex::new(pattern)?,
            build,
        })
    }
}

/// Maps incoming messages to intents
pub struct IntentClassifier {
    commands: Vec<CommandRule>,
    keyword_city: Regex,
}

impl IntentClassifier {
    /// Compile the rule table
    pub fn new() -> Result<Self, regex::Error> {
        // `(?:@\w+)?` accepts the bot mention Telegram appends in group chats
        let commands = vec![
            CommandRule::new("start", r"^/start(?:@\w+)?\b", |_| Intent::StartCommand)?,
            CommandRule::new("help", r"^/help(?:@\w+)?\b", |_| Intent::HelpCommand)?,
            CommandRule::new(
                "weather",
                r"(?is)^/(?:weather|погода)(?:@\w+)?\b(?:\s+(.*))?",
                |caps| Intent::weather(city_or_default(caps.get(1).map(|m| m.as_str()))),
            )?,
        ];

        // The preposition must be followed by whitespace so that cities such
        // as "Владивосток" or "India" keep their first letters
        let keyword_city = Regex::new(
            r"(?i)(?:погода|weather|температура)\s+(?:(?:в|in)\s+)?([а-яёa-z\s]+)",
        )?;

        Ok(Self {
            commands,
            keyword_city,
        })
    }

    /// Classify a message.
    ///
    /// Returns `None` for commands outside the rule table: those get no reply.
    pub fn classify(&self, message: &IncomingMessage) -> Option<Intent> {
        let text = message.body();

        if message.is_command() {
            return self.classify_command(text);
        }

        Some(self.classify_free_text(text))
    }

    fn classify_command(&self, text: &str) -> Option<Intent> {
        self.commands.iter().find_map(|rule| {
            rule.pattern.captures(text).map(|caps| {
                tracing::trace!("Command matched rule '{}'", rule.name);
                (rule.build)(&caps)
            })
        })
    }

    fn classify_free_text(&self, text: &str) -> Intent {
        let lowered = text.to_lowercase();
        if !WEATHER_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            return Intent::FreeText;
        }

        // Case-insensitive capture on the original text keeps the user's
        // spelling of the city
        let city = self
            .keyword_city
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str());

        Intent::weather(city_or_default(city))
    }
}

fn city_or_default(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(city) if !city.is_empty() => city.to_string(),
        _ => DEFAULT_CITY.to_string(),
    }
}
