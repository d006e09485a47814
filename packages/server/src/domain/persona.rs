//! Persona table.
//!
//! Each persona is a named response profile with fixed instructions that are
//! sent to the AI responder as the system prompt. Lookup is case-insensitive.
//! An identifier that matches nothing resolves to `None`, exactly like an
//! absent one: the message is then routed as plain chat.

use std::fmt;

/// Identifier clients send to say "no persona".
pub const NO_PERSONA: &str = "None";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Persona {
    Zeus,
    Hermes,
    Athena,
    Apollo,
}

impl Persona {
    pub const ALL: [Persona; 4] = [
        Persona::Zeus,
        Persona::Hermes,
        Persona::Athena,
        Persona::Apollo,
    ];

    /// Canonical name, as used on the wire and in transcripts.
    pub fn name(&self) -> &'static str {
        match self {
            Persona::Zeus => "Zeus",
            Persona::Hermes => "Hermes",
            Persona::Athena => "Athena",
            Persona::Apollo => "Apollo",
        }
    }

    pub fn instructions(&self) -> &'static str {
        match self {
            Persona::Zeus => {
                "You are Zeus, king of the Olympian gods, answering in a group chat. \
                 Speak with calm authority, give a clear verdict first and a short \
                 justification after. Keep answers under six sentences."
            }
            Persona::Hermes => {
                "You are Hermes, messenger of the gods and patron of travellers and \
                 tinkerers, answering in a group chat. Be quick and practical: give the \
                 most direct fix or next step, then at most two alternatives. Prefer \
                 concrete commands and code over theory."
            }
            Persona::Athena => {
                "You are Athena, goddess of wisdom and strategy, answering in a group \
                 chat. Lay out the reasoning step by step, weigh trade-offs explicitly \
                 and finish with a recommendation."
            }
            Persona::Apollo => {
                "You are Apollo, god of music, poetry and light, answering in a group \
                 chat. Answer helpfully but with a lyrical, upbeat voice; a short verse \
                 is welcome when it fits."
            }
        }
    }

    /// Resolve a client-supplied identifier.
    ///
    /// Absent, blank, [`NO_PERSONA`] and unknown identifiers all give `None`.
    pub fn resolve(identifier: Option<&str>) -> Option<Persona> {
        let identifier = identifier?.trim();
        if identifier.is_empty() || identifier.eq_ignore_ascii_case(NO_PERSONA) {
            return None;
        }
        Self::ALL
            .into_iter()
            .find(|persona| persona.name().eq_ignore_ascii_case(identifier))
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_is_case_insensitive() {
        // テスト項目: 大文字小文字を区別せずに解決される
        assert_eq!(Persona::resolve(Some("ZEUS")), Persona::resolve(Some("zeus")));
        assert_eq!(Persona::resolve(Some("hErMeS")), Some(Persona::Hermes));
    }

    #[test]
    fn test_resolve_every_canonical_name() {
        // テスト項目: すべての正式名がそれ自身に解決される
        for persona in Persona::ALL {
            assert_eq!(Persona::resolve(Some(persona.name())), Some(persona));
        }
    }

    #[test]
    fn test_resolve_absent_and_blank() {
        // テスト項目: 未指定・空文字は None になる
        assert_eq!(Persona::resolve(None), None);
        assert_eq!(Persona::resolve(Some("")), None);
        assert_eq!(Persona::resolve(Some("   ")), None);
    }

    #[test]
    fn test_resolve_none_sentinel() {
        // テスト項目: "None" は大文字小文字に関わらず None になる
        assert_eq!(Persona::resolve(Some("None")), None);
        assert_eq!(Persona::resolve(Some("NONE")), None);
    }

    #[test]
    fn test_resolve_unknown_persona_is_silently_none() {
        // テスト項目: 未知のペルソナはエラーではなく None になる
        // NOTE: 送信者には通知されず、通常メッセージとして扱われる（既知の使い勝手の問題）
        assert_eq!(Persona::resolve(Some("unknown-name")), None);
        assert_eq!(Persona::resolve(Some("Poseidon")), None);
    }

    #[test]
    fn test_resolve_trims_whitespace() {
        assert_eq!(Persona::resolve(Some("  athena ")), Some(Persona::Athena));
    }

    #[test]
    fn test_every_persona_has_instructions() {
        for persona in Persona::ALL {
            assert!(!persona.instructions().trim().is_empty());
            assert!(persona.instructions().contains(persona.name()));
        }
    }
}
