use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Dialog error: {0}")]
    Dialog(#[from] menubot_dialog::DialogError),

    #[error("Unauthorized access from chat_id: {0}")]
    Unauthorized(i64),
}

#[cfg(test)]
mod tests {
    use super::*;
    use menubot_dialog::{ConfigError, DialogError};

    #[test]
    fn dialog_errors_keep_their_message() {
        let err: Error =
            DialogError::from(ConfigError::UnknownTopic("quiz_art".to_string())).into();

        assert!(matches!(err, Error::Dialog(_)));
        assert_eq!(err.to_string(), "Dialog error: Unknown quiz topic: quiz_art");
    }

    #[test]
    fn unauthorized_names_the_chat() {
        assert_eq!(
            Error::Unauthorized(-42).to_string(),
            "Unauthorized access from chat_id: -42"
        );
    }
}
