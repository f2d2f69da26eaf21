use super::support::{token_spans, tokenize};
use crate::{lemmatize, AlgebraError, LemmaOptions, TokenFeatures};

fn features() -> TokenFeatures {
    TokenFeatures::new(4)
        .with_column("lemma", vec!["the", "party", "be", "notify"])
        .unwrap()
        .with_column("pos", vec!["DET", "NOUN", "AUX", "VERB"])
        .unwrap()
}

#[test]
fn joins_lemmas_with_spaces() {
    let tokens = tokenize("The parties were notified");
    let mut spans = token_spans(&tokens, &[(0, 2), (1, 4), (2, 2), (0, 1)]);
    spans.set_item(3, None).unwrap();

    let lemmas = lemmatize(&spans, &features(), &LemmaOptions::default()).unwrap();
    assert_eq!(
        lemmas,
        vec![
            Some("the party".to_string()),
            Some("party be notify".to_string()),
            Some(String::new()),
            None,
        ]
    );
}

#[test]
fn any_feature_column_can_be_used() {
    let tokens = tokenize("The parties were notified");
    let spans = token_spans(&tokens, &[(1, 4)]);
    let tags = lemmatize(
        &spans,
        &features(),
        &LemmaOptions::default().with_lemma_col_name("pos"),
    )
    .unwrap();
    assert_eq!(tags, vec![Some("NOUN AUX VERB".to_string())]);
    assert_eq!(features().column_names().collect::<Vec<_>>(), vec!["lemma", "pos"]);
}

#[test]
fn feature_columns_are_checked() {
    let tokens = tokenize("The parties were notified");
    let spans = token_spans(&tokens, &[(0, 1)]);

    let err = lemmatize(
        &spans,
        &features(),
        &LemmaOptions::default().with_lemma_col_name("stem"),
    )
    .unwrap_err();
    assert!(matches!(err, AlgebraError::MissingFeature(name) if name == "stem"));

    let err = TokenFeatures::new(4).with_column("lemma", vec!["too", "short"]).unwrap_err();
    assert!(matches!(
        err,
        AlgebraError::FeatureLength { expected: 4, actual: 2, .. }
    ));

    let short = TokenFeatures::new(2).with_column("lemma", vec!["the", "party"]).unwrap();
    let err = lemmatize(&spans, &short, &LemmaOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        AlgebraError::FeatureLength { expected: 4, actual: 2, .. }
    ));
}
