//! Message formatting utilities for client display.

use std::path::Path;

const RULE: &str = "============================================================";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the greeting received right after connecting
    pub fn format_connected(user_id: &str, timestamp: &str) -> String {
        format!("\nConnected as '{}' at {}\n", user_id, timestamp)
    }

    /// Format the join confirmation showing the room's members
    ///
    /// # Arguments
    ///
    /// * `room_id` - The room that was joined
    /// * `members` - All current members, including this client
    /// * `me` - This client's id (to mark as "me")
    /// * `timestamp` - When the relay processed the join
    pub fn format_room_joined(
        room_id: &str,
        members: &[String],
        me: Option<&str>,
        timestamp: &str,
    ) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n\n{}\n", RULE));
        output.push_str(&format!("Joined room '{}' at {}\n", room_id, timestamp));
        output.push_str("Members:\n");
        for member in members {
            let me_suffix = if Some(member.as_str()) == me { " (me)" } else { "" };
            output.push_str(&format!("  {}{}\n", member, me_suffix));
        }
        output.push_str(&format!("{}\n", RULE));
        output
    }

    pub fn format_room_left(room_id: &str, timestamp: &str) -> String {
        format!("\nLeft room '{}' at {}\n", room_id, timestamp)
    }

    pub fn format_user_joined(user_id: &str, room_id: &str, timestamp: &str) -> String {
        format!("\n+ {} joined '{}' at {}\n", user_id, room_id, timestamp)
    }

    pub fn format_user_left(user_id: &str, room_id: &str, timestamp: &str) -> String {
        format!("\n- {} left '{}' at {}\n", user_id, room_id, timestamp)
    }

    /// Format an incoming clip
    ///
    /// # Arguments
    ///
    /// * `sender_id` - Who recorded the clip
    /// * `payload_len` - Size of the data URL in bytes
    /// * `timestamp` - When the relay received the clip
    /// * `saved_to` - Where the clip was written, if saving is enabled
    pub fn format_audio(
        sender_id: &str,
        payload_len: usize,
        timestamp: &str,
        saved_to: Option<&Path>,
    ) -> String {
        let saved = match saved_to {
            Some(path) => format!("\nsaved to {}", path.display()),
            None => String::new(),
        };
        format!(
            "\n\n------------------------------------------------------------\n\
             @{}: [audio, {} bytes]\n\
             sent at {}{}\n\
             ------------------------------------------------------------\n",
            sender_id, payload_len, timestamp, saved
        )
    }

    pub fn format_sent_confirmation(path: &Path, payload_len: usize) -> String {
        format!("sent {} ({} bytes)\n", path.display(), payload_len)
    }

    pub fn format_help() -> String {
        "\nCommands:\n  \
         /join <room>   join a room (leaves the current one)\n  \
         /leave         leave the current room\n  \
         /send <file>   send an audio file to the room\n  \
         /help          show this help\n  \
         /quit          exit\n"
            .to_string()
    }

    /// Format a binary message notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n← Received {} bytes of binary data\n", byte_count)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}
