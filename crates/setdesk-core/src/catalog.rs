//! Which quick actions apply to a setting, by onboarding type and OS.

use std::collections::BTreeSet;

use crate::types::{ActionKind, OnboardingType};

/// Onboarding types that get the Windows group actions on a Windows machine.
const WINDOWS_ELIGIBLE: &[OnboardingType] = &[
    OnboardingType::New,
    OnboardingType::Replace,
    OnboardingType::Switch,
];

fn base_kinds(onboarding: OnboardingType) -> &'static [ActionKind] {
    match onboarding {
        OnboardingType::New | OnboardingType::Switch => &[ActionKind::OktaSetting],
        OnboardingType::Replace => &[
            ActionKind::OktaSetting,
            ActionKind::PasswordNotice,
            ActionKind::PickupNotice,
        ],
        OnboardingType::Rejoin => &[ActionKind::OktaActivate],
        OnboardingType::Pending => &[],
    }
}

/// `true` when `os` names Windows, ignoring case.
pub fn is_windows(os: &str) -> bool {
    os.eq_ignore_ascii_case("windows")
}

/// The active set for an onboarding type and OS.
pub fn active_kinds(onboarding: OnboardingType, os: &str) -> BTreeSet<ActionKind> {
    let mut kinds: BTreeSet<ActionKind> = base_kinds(onboarding).iter().copied().collect();
    if is_windows(os) && WINDOWS_ELIGIBLE.contains(&onboarding) {
        kinds.insert(ActionKind::WinSetting);
        kinds.insert(ActionKind::O365Intune);
    }
    kinds
}

/// Like [`active_kinds`] for an unparsed onboarding type. Unknown values
/// have nothing active.
pub fn active_kinds_raw(onboarding: &str, os: &str) -> BTreeSet<ActionKind> {
    match onboarding.parse::<OnboardingType>() {
        Ok(t) => active_kinds(t, os),
        Err(_) => BTreeSet::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use ActionKind::*;

    fn set(kinds: &[ActionKind]) -> BTreeSet<ActionKind> {
        kinds.iter().copied().collect()
    }

    #[test]
    fn new_on_windows() {
        assert_eq!(
            active_kinds(OnboardingType::New, "Windows"),
            set(&[OktaSetting, WinSetting, O365Intune])
        );
    }

    #[test]
    fn replace_on_macos_skips_windows_groups() {
        assert_eq!(
            active_kinds(OnboardingType::Replace, "macOS"),
            set(&[OktaSetting, PasswordNotice, PickupNotice])
        );
    }

    #[test]
    fn rejoin_never_gets_windows_groups() {
        assert_eq!(
            active_kinds(OnboardingType::Rejoin, "windows"),
            set(&[OktaActivate])
        );
    }

    #[test]
    fn pending_is_empty_on_any_os() {
        assert!(active_kinds(OnboardingType::Pending, "Windows").is_empty());
        assert!(active_kinds(OnboardingType::Pending, "macOS").is_empty());
    }

    #[test]
    fn os_match_is_case_insensitive() {
        assert_eq!(
            active_kinds(OnboardingType::Switch, "WINDOWS"),
            set(&[OktaSetting, WinSetting, O365Intune])
        );
        assert_eq!(
            active_kinds(OnboardingType::Switch, "Windows 11"),
            set(&[OktaSetting])
        );
    }

    #[test]
    fn unknown_onboarding_type_is_empty() {
        assert!(active_kinds_raw("contractor", "Windows").is_empty());
        assert_eq!(
            active_kinds_raw("replace", "Windows").len(),
            5,
            "replace on windows activates everything but okta-activate"
        );
    }
}
