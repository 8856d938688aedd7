//! Static event corpora used across harnesses.
//!
//! Each corpus is a `&'static [&'static str]` of JSON lines in the inbound
//! feed format. Expected counts are listed next to each corpus so harnesses
//! do not have to recompute them.

/// Three messages from three users, one join, one leave.
pub const CORPUS_BASIC: &[&str] = &[
    r#"{"kind":"message","chat_id":-100123,"user_id":1,"username":"ana","text":"morning #standup"}"#,
    r##"{"kind":"message","chat_id":-100123,"user_id":2,"username":"ben","text":"#Standup in 5, bc"}"##,
    r#"{"kind":"member_update","chat_id":-100123,"user_id":3,"username":"cy","old_status":"left","new_status":"member"}"#,
    r#"{"kind":"message","chat_id":-100123,"user_id":3,"username":"cy","text":"hi all #intro"}"#,
    r#"{"kind":"member_update","chat_id":-100123,"user_id":1,"username":"ana","old_status":"member","new_status":"kicked"}"#,
];

/// Records produced by [`CORPUS_BASIC`]: 3 messages, 1 join, 1 leave.
pub const CORPUS_BASIC_MESSAGES: usize = 3;

/// Events the coordinator drops without error.
pub const CORPUS_DROPPED: &[&str] = &[
    r#"{"kind":"message","chat_id":-100123,"user_id":1,"username":"ana"}"#,
    r#"{"kind":"message","chat_id":-100123,"user_id":1,"username":"ana","text":""}"#,
    r#"{"kind":"member_update","chat_id":-100123,"user_id":2,"old_status":"restricted","new_status":"member"}"#,
    r#"{"kind":"member_update","chat_id":-100123,"user_id":2,"old_status":"member","new_status":"administrator"}"#,
];

/// Lines that are not valid events.
pub const CORPUS_MALFORMED: &[&str] = &[
    "{not json",
    r#"{"kind":"reaction","chat_id":1,"user_id":2,"emoji":"+1"}"#,
    r#"{"kind":"message","user_id":2,"text":"no chat id"}"#,
    "[]",
];

/// Texts with interesting hashtag shapes.
pub const HASHTAG_TEXTS: &[&str] = &[
    "#go rocks",
    "#GO is fast",
    "#rust too",
    "trailing #punct! and (#paren)",
    "no tags here",
    "## double and #",
    "unicode #café #日本",
    "#a#b",
];
