//! Tests for the snowflake id newtypes and the message event type.

use hearth_common::types::*;
use std::collections::HashMap;

#[cfg(test)]
mod newtype_trait_tests {
    use super::*;

    #[test]
    fn test_channel_id_implements_expected_traits() {
        let channel_id = ChannelId(123_456_789);

        assert_eq!(format!("{channel_id:?}"), "ChannelId(123456789)");
        assert_eq!(format!("{channel_id}"), "123456789");
        assert_eq!(channel_id.mention(), "<#123456789>");

        let mut map = HashMap::new();
        map.insert(channel_id, "test_channel");
        assert_eq!(map.get(&channel_id), Some(&"test_channel"));
    }

    #[test]
    fn test_ids_serialize_as_strings() {
        let user_id = UserId(987_654_321);
        let serialized = serde_json::to_string(&user_id).unwrap();
        assert_eq!(serialized, "\"987654321\"");
    }

    #[test]
    fn test_ids_deserialize_from_numbers_and_strings() {
        let from_number: ChannelId = serde_json::from_str("555000000000000001").unwrap();
        let from_string: ChannelId = serde_json::from_str("\"555000000000000001\"").unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(from_number.get(), 555_000_000_000_000_001);

        let optional: Option<ChannelId> = serde_json::from_str("null").unwrap();
        assert!(optional.is_none());
    }

    #[test]
    fn test_ids_reject_garbage() {
        assert!(serde_json::from_str::<ChannelId>("\"general\"").is_err());
        assert!(serde_json::from_str::<ChannelId>("-5").is_err());
    }
}

#[cfg(test)]
mod mention_parsing_tests {
    use super::*;

    #[test]
    fn test_parse_raw_and_mentions() {
        assert_eq!("42".parse::<ChannelId>().unwrap(), ChannelId(42));
        assert_eq!("<#42>".parse::<ChannelId>().unwrap(), ChannelId(42));
        assert_eq!("<@42>".parse::<UserId>().unwrap(), UserId(42));
        assert_eq!("<@!42>".parse::<UserId>().unwrap(), UserId(42));
        assert_eq!("<@&42>".parse::<RoleId>().unwrap(), RoleId(42));
        assert_eq!("  77 ".parse::<MessageId>().unwrap(), MessageId(77));
    }

    #[test]
    fn test_parse_rejects_malformed_references() {
        let error = "#general".parse::<ChannelId>().unwrap_err();
        assert_eq!(error.input, "#general");
        assert!(error.to_string().contains("not a valid Discord id"));

        assert!("0".parse::<ChannelId>().is_err());
        assert!("<#>".parse::<ChannelId>().is_err());
        assert!("".parse::<ChannelId>().is_err());
    }

    #[test]
    fn test_user_mention() {
        assert_eq!(UserId(7).mention(), "<@7>");
    }
}
