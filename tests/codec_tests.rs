use cipherbreak::alphabet::{Alphabet, Key};
use cipherbreak::alphabets::{get_all_alphabets, KnownAlphabet};
use cipherbreak::error::CipherBreakError;
use rstest::rstest;
use std::collections::HashSet;

fn default_alphabet() -> Alphabet {
    Alphabet::preset(KnownAlphabet::UpperUnderscore).unwrap()
}

#[test]
fn test_identity_key_is_a_no_op() {
    let alphabet = default_alphabet();
    let key = Key::identity(&alphabet);

    assert_eq!(alphabet.encode("HELLO_WORLD", &key), "HELLO_WORLD");
    assert_eq!(alphabet.decode("HELLO_WORLD", &key), "HELLO_WORLD");
}

#[test]
fn test_reversed_key_maps_first_symbol_to_last() {
    let alphabet = default_alphabet();
    let reversed: String = alphabet.as_string().chars().rev().collect();
    let key = Key::parse(&reversed, &alphabet).unwrap();

    assert_eq!(alphabet.encode("A", &key), "_");
    assert_eq!(alphabet.decode("_", &key), "A");
    assert_eq!(alphabet.encode("AB_", &key), "_ZA");
}

#[test]
fn test_foreign_characters_pass_through() {
    let alphabet = default_alphabet();
    let key = Key::identity(&alphabet).swapped(0, 1);

    let encoded = alphabet.encode("A-b 1B!", &key);
    assert_eq!(encoded, "B-b 1A!");
    assert_eq!(alphabet.decode(&encoded, &key), "A-b 1B!");
}

#[test]
fn test_empty_text_round_trips() {
    let alphabet = default_alphabet();
    let key = alphabet.random_key(&mut fastrand::Rng::with_seed(1));
    assert_eq!(alphabet.encode("", &key), "");
    assert_eq!(alphabet.decode("", &key), "");
}

#[rstest]
#[case(KnownAlphabet::UpperUnderscore, "THE_QUICK_BROWN_FOX")]
#[case(KnownAlphabet::UpperSpace, "THE QUICK BROWN FOX")]
#[case(KnownAlphabet::LowerSpace, "the quick brown fox, jumps.")]
#[case(KnownAlphabet::Upper, "THEQUICKBROWNFOX")]
fn test_round_trip_for_presets(#[case] preset: KnownAlphabet, #[case] text: &str) {
    let alphabet = Alphabet::preset(preset).unwrap();
    let mut rng = fastrand::Rng::with_seed(42);

    for _ in 0..5 {
        let key = alphabet.random_key(&mut rng);
        let encoded = alphabet.encode(text, &key);
        assert_eq!(encoded.chars().count(), text.chars().count());
        assert_eq!(alphabet.decode(&encoded, &key), text);
    }
}

#[rstest]
#[case("ABC")] // too short
#[case("ABCDEFGHIJKLMNOPQRSTUVWXYZ__")] // too long
#[case("ABCDEFGHIJKLMNOPQRSTUVWXYA_")] // duplicate A
#[case("ABCDEFGHIJKLMNOPQRSTUVWXY-_")] // foreign '-'
fn test_invalid_keys_are_rejected(#[case] key: &str) {
    let alphabet = default_alphabet();
    let err = Key::parse(key, &alphabet).unwrap_err();
    assert!(matches!(err, CipherBreakError::InvalidKey(_)), "got {:?}", err);
}

#[rstest]
#[case("")]
#[case("A")]
#[case("ABCA")]
#[case("ABCÉ")]
fn test_invalid_alphabets_are_rejected(#[case] symbols: &str) {
    let err = Alphabet::new(symbols).unwrap_err();
    assert!(matches!(err, CipherBreakError::Config(_)), "got {:?}", err);
}

#[test]
fn test_random_keys_are_permutations_and_vary() {
    let alphabet = default_alphabet();
    let mut rng = fastrand::Rng::with_seed(2024);
    let mut seen = HashSet::new();

    for _ in 0..20 {
        let key = alphabet.random_key(&mut rng);
        let rendered = key.render(&alphabet);

        let mut symbols: Vec<char> = rendered.chars().collect();
        symbols.sort_unstable();
        let mut expected: Vec<char> = alphabet.as_string().chars().collect();
        expected.sort_unstable();
        assert_eq!(symbols, expected);

        // Re-parsing the rendered key yields the same key
        assert_eq!(Key::parse(&rendered, &alphabet).unwrap(), key);
        seen.insert(rendered);
    }

    assert!(seen.len() > 1, "20 random keys were all identical");
}

#[test]
fn test_every_preset_is_listed() {
    let all = get_all_alphabets();
    assert_eq!(all.len(), 4);
    for (preset, symbols) in all {
        assert_eq!(preset.symbols(), symbols);
        assert!(Alphabet::new(symbols).is_ok());
    }
}
