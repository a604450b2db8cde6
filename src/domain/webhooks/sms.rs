//! Inbound SMS deliveries and carrier compliance keywords.

use axum::body::Bytes;

use super::errors::WebhookError;
use super::twilio::form_params;

/// Compliance keyword carried by an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmsKeyword {
    /// Sender asks to stop receiving messages.
    OptOut,
    /// Sender asks for help text.
    Help,
    /// Sender re-subscribes after an opt-out.
    OptIn,
    /// Any other message.
    Other,
}

impl SmsKeyword {
    /// Classifies a message body. Only an exact keyword (ignoring case and
    /// surrounding whitespace) counts; "stop it" is `Other`.
    pub fn classify(body: &str) -> Self {
        match body.trim().to_ascii_uppercase().as_str() {
            "STOP" | "STOPALL" | "UNSUBSCRIBE" | "CANCEL" | "END" | "QUIT" => SmsKeyword::OptOut,
            "HELP" | "INFO" | "SUPPORT" => SmsKeyword::Help,
            "START" | "YES" | "UNSTOP" => SmsKeyword::OptIn,
            _ => SmsKeyword::Other,
        }
    }
}

/// A verified inbound text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundSms {
    pub message_sid: String,
    pub from: String,
    pub to: String,
    pub body: String,
    pub keyword: SmsKeyword,
}

impl InboundSms {
    /// Reads a message from a form-urlencoded delivery body.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPayload` when `From` is missing.
    pub fn from_form(body: &[u8]) -> Result<Self, WebhookError> {
        let params = form_params(body);
        let first = |key: &str| {
            params
                .get(key)
                .and_then(|values| values.iter().next())
                .cloned()
                .unwrap_or_default()
        };

        let from = first("From");
        if from.is_empty() {
            return Err(WebhookError::InvalidPayload("missing From".to_string()));
        }
        let text = first("Body");

        Ok(Self {
            message_sid: first("MessageSid"),
            from,
            to: first("To"),
            keyword: SmsKeyword::classify(&text),
            body: text,
        })
    }
}

/// A verified Twilio delivery, split by what its body carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TwilioDelivery {
    /// Form callback with a sender; classified for compliance keywords.
    Sms(InboundSms),
    /// Anything else (JSON `bodySHA256` deliveries, status callbacks
    /// without `From`). Passed on unparsed.
    Callback(Bytes),
}

impl TwilioDelivery {
    /// Splits a verified body. Never fails: a body that is not an SMS is
    /// still an authentic delivery.
    pub fn from_body(body: Bytes) -> Self {
        match InboundSms::from_form(&body) {
            Ok(sms) => TwilioDelivery::Sms(sms),
            Err(_) => TwilioDelivery::Callback(body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opt_out_keywords() {
        for word in ["STOP", "stop", " Unsubscribe ", "cancel", "END", "quit", "StopAll"] {
            assert_eq!(SmsKeyword::classify(word), SmsKeyword::OptOut, "{}", word);
        }
    }

    #[test]
    fn help_keywords() {
        for word in ["HELP", "info", "Support"] {
            assert_eq!(SmsKeyword::classify(word), SmsKeyword::Help, "{}", word);
        }
    }

    #[test]
    fn opt_in_keywords() {
        for word in ["START", "yes", "unstop"] {
            assert_eq!(SmsKeyword::classify(word), SmsKeyword::OptIn, "{}", word);
        }
    }

    #[test]
    fn sentences_are_not_keywords() {
        assert_eq!(SmsKeyword::classify("please stop"), SmsKeyword::Other);
        assert_eq!(SmsKeyword::classify(""), SmsKeyword::Other);
    }

    #[test]
    fn from_form_reads_fields() {
        let sms = InboundSms::from_form(
            b"MessageSid=SM123&From=%2B15550001111&To=%2B15550002222&Body=Stop",
        )
        .unwrap();

        assert_eq!(sms.message_sid, "SM123");
        assert_eq!(sms.from, "+15550001111");
        assert_eq!(sms.to, "+15550002222");
        assert_eq!(sms.body, "Stop");
        assert_eq!(sms.keyword, SmsKeyword::OptOut);
    }

    #[test]
    fn from_form_without_sender_is_invalid() {
        assert!(matches!(
            InboundSms::from_form(b"Body=hi"),
            Err(WebhookError::InvalidPayload(_))
        ));
    }

    #[test]
    fn form_with_sender_is_sms() {
        let delivery = TwilioDelivery::from_body(Bytes::from_static(b"From=%2B15550001111&Body=help"));
        assert!(matches!(delivery, TwilioDelivery::Sms(ref sms) if sms.keyword == SmsKeyword::Help));
    }

    #[test]
    fn json_body_is_callback() {
        let raw = Bytes::from_static(br#"{"MessageStatus":"delivered"}"#);
        assert_eq!(TwilioDelivery::from_body(raw.clone()), TwilioDelivery::Callback(raw));
    }

    #[test]
    fn status_callback_without_sender_is_callback() {
        let raw = Bytes::from_static(b"MessageSid=SM1&MessageStatus=delivered");
        assert_eq!(TwilioDelivery::from_body(raw.clone()), TwilioDelivery::Callback(raw));
    }
}
