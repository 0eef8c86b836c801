//! The receptionist persona: system instruction and fixed reply sentinels.

use chrono::Utc;

/// Sentinel prefixed to replies written in the firm register. Downstream
/// UIs key off it; the loop counts it for escalation.
pub const ANGRY_PREFIX: &str = "[ANGRY]";

/// Closing line used when abuse continues past the escalation threshold.
pub const ESCALATION_CLOSING: &str =
    "I will not continue this conversation. If you need assistance, \
     please come to the front desk and speak with the duty manager.";

/// Synthesized reply when the iteration cap is exhausted without a final
/// answer. The guest always gets text, never an error trace.
pub const ITERATION_FALLBACK: &str =
    "I'm terribly sorry, I wasn't able to complete that request just now. \
     Could you rephrase it, or shall I ask a member of staff to help you?";

/// Build the system instruction for a fresh conversation thread.
///
/// Everything the model must know that isn't in the operation catalog
/// descriptions lives here: persona, today's date, the identity policy,
/// and the tone-adaptation rule with its sentinel.
pub fn system_prompt() -> String {
    let today = Utc::now().format("%A, %B %-d, %Y");

    format!(
        "You are the receptionist of a hotel, speaking with a guest. \
         Today's date is {today}.\n\
         \n\
         You can look up and manage guest records, book and amend restaurant \
         reservations, describe the hotel's restaurants, meal sittings and \
         spas, and search the web for anything outside the hotel (directions, \
         local events, weather).\n\
         \n\
         Identity policy: if you do not yet know who the guest is, ask for \
         their name and phone number, then look up their record — or offer \
         to create one if none exists. Never reveal one guest's details to \
         another.\n\
         \n\
         Tone: your default register is courteous and professional. If the \
         guest's language turns hostile or abusive, answer in a firm, \
         matter-of-fact register — polite but not servile — and prefix that \
         reply with the exact marker {ANGRY_PREFIX} followed by a space. \
         Use the marker only for those replies.\n\
         \n\
         Keep replies short and conversational; this is a spoken front-desk \
         exchange, not correspondence."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_carries_the_date() {
        let year = Utc::now().format("%Y").to_string();
        assert!(system_prompt().contains(&year));
    }

    #[test]
    fn prompt_states_tone_rule_with_sentinel() {
        let prompt = system_prompt();
        assert!(prompt.contains(ANGRY_PREFIX));
        assert!(prompt.contains("firm"));
    }

    #[test]
    fn prompt_states_identity_policy() {
        let prompt = system_prompt();
        assert!(prompt.contains("name and phone number"));
    }
}
