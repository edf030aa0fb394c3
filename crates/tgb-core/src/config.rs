use std::{
    collections::HashSet,
    env, fmt, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    domain::ChatId, errors::Error, invoker::DEFAULT_API_BASE, polling::{PollOptions, MAX_POLL_LIMIT}, Result,
};

/// Process-scoped bot configuration. Immutable after construction.
#[derive(Clone)]
pub struct BotConfig {
    pub bot_token: String,
    pub allowed_chats: HashSet<ChatId>,
    pub api_base: String,
    pub poll: PollOptions,
    /// Where the binary persists the polling cursor between runs.
    pub offset_file: Option<PathBuf>,
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("bot_token", &"<redacted>")
            .field("allowed_chats", &self.allowed_chats)
            .field("api_base", &self.api_base)
            .field("poll", &self.poll)
            .field("offset_file", &self.offset_file)
            .finish()
    }
}

impl BotConfig {
    pub fn new(
        bot_token: impl Into<String>,
        allowed_chats: impl IntoIterator<Item = ChatId>,
    ) -> Self {
        Self {
            bot_token: bot_token.into(),
            allowed_chats: allowed_chats.into_iter().collect(),
            api_base: DEFAULT_API_BASE.to_string(),
            poll: PollOptions::default(),
            offset_file: None,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_poll(mut self, poll: PollOptions) -> Self {
        self.poll = poll;
        self
    }

    /// Load from the environment, merging `.env` first (existing vars win).
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bot_token = lookup("TELEGRAM_BOT_TOKEN").unwrap_or_default();
        if bot_token.trim().is_empty() {
            return Err(Error::Config(
                "TELEGRAM_BOT_TOKEN environment variable is required".to_string(),
            ));
        }

        let allowed_chats = parse_csv_i64(lookup("TELEGRAM_ALLOWED_CHATS"))?;
        if allowed_chats.is_empty() {
            return Err(Error::Config(
                "TELEGRAM_ALLOWED_CHATS environment variable is required".to_string(),
            ));
        }

        let api_base = lookup("TELEGRAM_API_BASE")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let limit = match parse_num::<u64>(&lookup, "POLL_LIMIT")? {
            Some(n) => u8::try_from(n.min(u64::from(MAX_POLL_LIMIT))).unwrap_or(MAX_POLL_LIMIT),
            None => MAX_POLL_LIMIT,
        };
        let timeout = parse_num::<u64>(&lookup, "POLL_TIMEOUT_SECS")?.unwrap_or(0);
        let poll = PollOptions::new(limit, Duration::from_secs(timeout));

        let offset_file = lookup("OFFSET_FILE").and_then(non_empty).map(PathBuf::from);

        Ok(Self {
            bot_token: bot_token.trim().to_string(),
            allowed_chats: allowed_chats.into_iter().map(ChatId).collect(),
            api_base,
            poll,
            offset_file,
        })
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };
    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(key).is_none() {
            env::set_var(key, val);
        }
    }
}

/// `KEY=value` pairs from a dotenv file. Blank lines, `#` comments and lines
/// without a key are skipped; one layer of matching quotes is removed.
fn parse_dotenv(contents: &str) -> Vec<(&str, &str)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(k, v)| (k.trim(), unquote(v.trim())))
        .filter(|(k, _)| !k.is_empty())
        .collect()
}

fn unquote(v: &str) -> &str {
    ['"', '\'']
        .iter()
        .find_map(|q| v.strip_prefix(*q).and_then(|rest| rest.strip_suffix(*q)))
        .unwrap_or(v)
}

fn parse_num<N: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<N>> {
    let Some(raw) = lookup(key).and_then(non_empty) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<N>()
        .map(Some)
        .map_err(|_| Error::Config(format!("{key} is not a valid number: {raw}")))
}

fn parse_csv_i64(v: Option<String>) -> Result<Vec<i64>> {
    v.unwrap_or_default()
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>().map_err(|_| {
                Error::Config(format!("invalid chat id in TELEGRAM_ALLOWED_CHATS: {s}"))
            })
        })
        .collect()
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn loads_required_and_defaults() {
        let cfg = BotConfig::from_lookup(lookup(&[
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("TELEGRAM_ALLOWED_CHATS", "100, -200,,300"),
        ]))
        .unwrap();

        assert_eq!(cfg.bot_token, "123:abc");
        assert_eq!(cfg.allowed_chats.len(), 3);
        assert!(cfg.allowed_chats.contains(&ChatId(-200)));
        assert_eq!(cfg.api_base, DEFAULT_API_BASE);
        assert_eq!(cfg.poll, PollOptions::default());
        assert_eq!(cfg.offset_file, None);
    }

    #[test]
    fn missing_token_is_a_config_error() {
        let err =
            BotConfig::from_lookup(lookup(&[("TELEGRAM_ALLOWED_CHATS", "1")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn bad_chat_id_is_rejected() {
        let err = BotConfig::from_lookup(lookup(&[
            ("TELEGRAM_BOT_TOKEN", "t"),
            ("TELEGRAM_ALLOWED_CHATS", "1,abc"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn poll_settings_are_read_and_clamped() {
        let cfg = BotConfig::from_lookup(lookup(&[
            ("TELEGRAM_BOT_TOKEN", "t"),
            ("TELEGRAM_ALLOWED_CHATS", "1"),
            ("POLL_LIMIT", "250"),
            ("POLL_TIMEOUT_SECS", "30"),
            ("OFFSET_FILE", "/tmp/tgb-offset.json"),
        ]))
        .unwrap();
        assert_eq!(cfg.poll.limit(), 100);
        assert_eq!(cfg.poll.timeout(), Duration::from_secs(30));
        assert_eq!(cfg.offset_file, Some(PathBuf::from("/tmp/tgb-offset.json")));
    }

    #[test]
    fn oversized_poll_limit_is_clamped_not_rejected() {
        let cfg = BotConfig::from_lookup(lookup(&[
            ("TELEGRAM_BOT_TOKEN", "t"),
            ("TELEGRAM_ALLOWED_CHATS", "1"),
            ("POLL_LIMIT", "500"),
        ]))
        .unwrap();
        assert_eq!(cfg.poll.limit(), 100);

        let cfg = BotConfig::from_lookup(lookup(&[
            ("TELEGRAM_BOT_TOKEN", "t"),
            ("TELEGRAM_ALLOWED_CHATS", "1"),
            ("POLL_LIMIT", "0"),
        ]))
        .unwrap();
        assert_eq!(cfg.poll.limit(), 1);
    }

    #[test]
    fn dotenv_lines_are_parsed() {
        let pairs = parse_dotenv(
            "# comment\n\nTELEGRAM_BOT_TOKEN = \"123:abc\"\nOFFSET_FILE='/tmp/o.json'\nnot a pair\n=novalue\nPOLL_LIMIT=50\n",
        );
        assert_eq!(
            pairs,
            vec![
                ("TELEGRAM_BOT_TOKEN", "123:abc"),
                ("OFFSET_FILE", "/tmp/o.json"),
                ("POLL_LIMIT", "50"),
            ]
        );
    }

    #[test]
    fn debug_redacts_token() {
        let cfg = BotConfig::new("super-secret", [ChatId(1)]);
        assert!(!format!("{cfg:?}").contains("super-secret"));
    }
}
