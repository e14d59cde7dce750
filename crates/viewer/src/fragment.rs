//! View state as a shareable URL fragment:
//! `sel=<ids>&groups=<groups>&labels=<bool>&dist=<n>&charge=<n>`.
//!
//! Ids are percent-encoded one by one (the `encodeURIComponent` set) and
//! joined with commas. Decoding never fails: missing keys keep their
//! defaults, values that do not parse are ignored, unknown group names are
//! dropped and layout values are clamped.

use crate::group::Group;
use crate::state::ViewState;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters `encodeURIComponent` escapes.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode(state: &ViewState) -> String {
    let selection: Vec<String> = state
        .selection
        .iter()
        .map(|id| utf8_percent_encode(id, COMPONENT).to_string())
        .collect();
    let groups: Vec<&str> = Group::ALL
        .into_iter()
        .filter(|group| state.is_active(*group))
        .map(Group::as_str)
        .collect();

    format!(
        "sel={}&groups={}&labels={}&dist={}&charge={}",
        selection.join(","),
        groups.join(","),
        state.labels,
        state.distance,
        state.charge
    )
}

pub fn decode(fragment: &str) -> ViewState {
    let mut state = ViewState::default();
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);

    for pair in fragment.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        match key {
            "sel" => {
                state.selection = value
                    .split(',')
                    .filter(|id| !id.is_empty())
                    .filter_map(|id| percent_decode_str(id).decode_utf8().ok())
                    .map(|id| id.into_owned())
                    .collect();
            }
            "groups" => {
                state.groups = value.split(',').filter_map(Group::parse).collect();
            }
            "labels" => match value {
                "true" => state.labels = true,
                "false" => state.labels = false,
                _ => log::debug!("Ignoring labels value {value:?}"),
            },
            "dist" => match value.parse() {
                Ok(distance) => state.set_distance(distance),
                Err(_) => log::debug!("Ignoring dist value {value:?}"),
            },
            "charge" => match value.parse() {
                Ok(charge) => state.set_charge(charge),
                Err(_) => log::debug!("Ignoring charge value {value:?}"),
            },
            _ => log::debug!("Ignoring unknown fragment key {key:?}"),
        }
    }

    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ids_are_encoded_individually() {
        let mut state = ViewState::default();
        state.selection.insert("(*example.com/m/pkg.Account).Withdraw".to_string());
        state.selection.insert("example.com/m/pkg.Account".to_string());

        assert_eq!(
            encode(&state),
            "sel=(*example.com%2Fm%2Fpkg.Account).Withdraw,example.com%2Fm%2Fpkg.Account\
             &groups=test,type,method,func,const,var&labels=true&dist=120&charge=-300"
        );
    }

    #[test]
    fn commas_inside_ids_survive() {
        let mut state = ViewState::default();
        state.selection.insert("(pkg.Pair[K, V]).Get".to_string());
        assert_eq!(decode(&encode(&state)), state);
    }

    #[test]
    fn missing_keys_keep_defaults() {
        assert_eq!(decode(""), ViewState::default());
        assert_eq!(decode("#"), ViewState::default());

        let state = decode("#labels=false");
        assert!(!state.labels);
        assert_eq!(state.distance, 120);
        assert_eq!(state.groups.len(), 6);
    }

    #[test]
    fn bad_values_are_ignored_or_clamped() {
        let state = decode("groups=type,bogus,func&labels=maybe&dist=9999&charge=abc&zoom=2");
        assert_eq!(
            state.groups.into_iter().collect::<Vec<_>>(),
            vec![Group::Type, Group::Func]
        );
        assert!(state.labels);
        assert_eq!(state.distance, 300);
        assert_eq!(state.charge, -300);
    }

    #[test]
    fn empty_groups_disable_everything() {
        assert!(decode("groups=").groups.is_empty());
    }
}
