//! Fixed reply texts and the random greeting draw

use rand::seq::IndexedRandom;
use rand::Rng;

pub const GREETINGS: [&str; 3] = [
    "Привет, я бот!",
    "Здравствуйте, я бот!",
    "Добрый день, я бот!",
];

/// "Wisdom of the day" quotes
pub const WISDOMS: [&str; 5] = [
    "Каждый день — новый шанс стать лучше, чем вчера.",
    "Самый тёмный час — перед рассветом.",
    "Маленький шаг сегодня лучше, чем большое «завтра».",
    "Не бойся ошибок — бойся бездействия.",
    "Сила в том, чтобы начать, мудрость — чтобы продолжать.",
];

/// Appended to the `/start` greeting
pub const USAGE_HINT: &str = "Я умею:\n\
    🌤️ Показывать погоду - напишите \"погода\" или используйте команды /weather или /погода\n\
    💬 Общаться - просто напишите мне что-нибудь!\n\n\
    Попробуйте написать \"погода Москва\" или \"/weather London\"";

pub const HELP: &str = "📋 Доступные команды:\n\n\
    /start - Начать работу с ботом\n\
    /help - Показать эту справку\n\
    /weather [город] - Погода в указанном городе (по умолчанию Montreal)\n\
    /погода [город] - То же самое на русском\n\n\
    💡 Вы также можете просто написать \"погода\" или \"weather\" в сообщении!";

pub const WEATHER_NOT_CONFIGURED: &str = "Error: WEATHER_API_KEY is not configured. \
    Get an API key at https://openweathermap.org/api";

pub const WEATHER_FAILED: &str = "Error fetching weather data. Please try again later.";

pub fn city_not_found(city: &str) -> String {
    format!(
        "City \"{}\" not found. Try specifying a different city.",
        city
    )
}

/// Random greeting followed by a random wisdom, drawn independently
pub fn greeting_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let greeting = GREETINGS.choose(rng).copied().unwrap_or(GREETINGS[0]);
    let wisdom = WISDOMS.choose(rng).copied().unwrap_or(WISDOMS[0]);
    format!("{}\n\nМудрость дня: {}", greeting, wisdom)
}

/// Greeting plus the usage hint, sent for `/start`
pub fn welcome_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{}\n\n{}", greeting_with(rng), USAGE_HINT)
}

pub fn greeting() -> String {
    greeting_with(&mut rand::rng())
}

pub fn welcome() -> String {
    welcome_with(&mut rand::rng())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn all_pairs() -> HashSet<String> {
        GREETINGS
            .iter()
            .flat_map(|g| {
                WISDOMS
                    .iter()
                    .map(move |w| format!("{}\n\nМудрость дня: {}", g, w))
            })
            .collect()
    }

    #[test]
    fn test_every_pair_is_reachable_and_nothing_else_appears() {
        let expected = all_pairs();
        let mut rng = StdRng::seed_from_u64(2024);
        let mut seen = HashSet::new();

        for _ in 0..2000 {
            let reply = greeting_with(&mut rng);
            assert!(expected.contains(&reply), "unexpected reply: {}", reply);
            seen.insert(reply);
        }

        assert_eq!(seen.len(), GREETINGS.len() * WISDOMS.len());
    }

    #[test]
    fn test_welcome_appends_usage_hint() {
        let mut rng = StdRng::seed_from_u64(1);
        let reply = welcome_with(&mut rng);
        let (greeting, hint) = reply.split_at(reply.len() - USAGE_HINT.len());

        assert_eq!(hint, USAGE_HINT);
        assert!(all_pairs().contains(greeting.trim_end_matches('\n')));
    }

    #[test]
    fn test_help_lists_every_command() {
        for command in ["/start", "/help", "/weather", "/погода"] {
            assert!(HELP.contains(command), "help is missing {}", command);
        }
    }

    #[test]
    fn test_not_found_names_the_city() {
        assert_eq!(
            city_not_found("Nowhereland"),
            "City \"Nowhereland\" not found. Try specifying a different city."
        );
    }
}
