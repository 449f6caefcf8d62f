pub mod card_format;
