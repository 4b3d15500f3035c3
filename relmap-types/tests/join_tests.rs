use relmap_types::{Error, JoinType, SqlExpression};
use std::str::FromStr;

#[test]
fn default_join_is_left() {
    assert_eq!(JoinType::default(), JoinType::Left);
}

#[test]
fn parse_is_case_insensitive() {
    assert_eq!(JoinType::from_str("inner").unwrap(), JoinType::Inner);
    assert_eq!(JoinType::from_str(" Right ").unwrap(), JoinType::Right);
    assert_eq!(JoinType::from_str("FULL").unwrap(), JoinType::Full);
}

#[test]
fn parse_unknown_join() {
    let err = JoinType::from_str("sideways").unwrap_err();
    assert!(matches!(err, Error::UnknownJoinType(ref t) if t == "SIDEWAYS"));
}

#[test]
fn display_matches_keyword() {
    for join in JoinType::ALL {
        assert_eq!(join.to_string(), join.as_str());
        assert_eq!(JoinType::from_str(join.as_str()).unwrap(), join);
    }
}

#[test]
fn join_type_serde_uses_keywords() {
    assert_eq!(serde_json::to_string(&JoinType::Inner).unwrap(), "\"INNER\"");
    let parsed: JoinType = serde_json::from_str("\"LEFT\"").unwrap();
    assert_eq!(parsed, JoinType::Left);
}

#[test]
fn expression_display_is_verbatim() {
    let expr = SqlExpression::new("COUNT(*) + 1");
    assert_eq!(expr.to_string(), "COUNT(*) + 1");
    assert_eq!(expr.clone().into_inner(), "COUNT(*) + 1");
}

proptest::proptest! {
    #[test]
    fn parse_ignores_letter_case(index in 0usize..4, mask in proptest::collection::vec(proptest::bool::ANY, 5)) {
        let join = JoinType::ALL[index];
        let mixed: String = join
            .as_str()
            .chars()
            .zip(mask.iter().cycle())
            .map(|(c, lower)| if *lower { c.to_ascii_lowercase() } else { c })
            .collect();
        proptest::prop_assert_eq!(JoinType::from_str(&mixed).unwrap(), join);
    }

    #[test]
    fn parse_rejects_other_words(word in "[a-z]{1,8}") {
        let known = JoinType::ALL.iter().any(|j| j.as_str().eq_ignore_ascii_case(&word));
        proptest::prop_assert_eq!(JoinType::from_str(&word).is_ok(), known);
    }
}
