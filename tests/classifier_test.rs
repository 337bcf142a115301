use email_features::{
    Classification, Classifier, FeatureError, FeaturePipeline, FeatureRecord, HashingEmbedder,
    HeaderFeatures, LinearClassifier, SpamFilter, Verdict,
};
use std::sync::Arc;

const DIMENSION: usize = 4;

fn pipeline() -> FeaturePipeline {
    FeaturePipeline::new(Arc::new(HashingEmbedder::new(DIMENSION).unwrap()))
}

/// Weights that only look at `to_contains_undisclosed_recipients`
fn undisclosed_model() -> LinearClassifier {
    let mut weights = vec![0.0; HeaderFeatures::NAMES.len() + DIMENSION];
    let column = HeaderFeatures::NAMES
        .iter()
        .position(|n| *n == "to_contains_undisclosed_recipients")
        .unwrap();
    weights[column] = 8.0;
    LinearClassifier::new(weights, -4.0)
}

// --- Classification ---

#[test]
fn test_confidence_is_clamped() {
    assert_eq!(Classification::new(Verdict::Spam, 1.7).confidence, 1.0);
    assert_eq!(Classification::new(Verdict::Ham, -0.2).confidence, 0.0);
    assert_eq!(Classification::new(Verdict::Ham, f32::NAN).confidence, 0.0);
    assert!(Classification::new(Verdict::Spam, 0.9).is_spam());
}

#[test]
fn test_verdict_display() {
    assert_eq!(Verdict::Spam.to_string(), "SPAM");
    assert_eq!(Verdict::Ham.to_string(), "HAM");
}

// --- LinearClassifier ---

#[test]
fn test_linear_classifier_spam() {
    let record = pipeline()
        .transform("To: undisclosed-recipients:;\n\nbuy now")
        .unwrap();

    let result = undisclosed_model().classify(&record).unwrap();
    assert_eq!(result.verdict, Verdict::Spam);
    assert!(result.confidence > 0.9);
}

#[test]
fn test_linear_classifier_ham() {
    let record = pipeline().transform("To: bob@example.com\n\nhi bob").unwrap();

    let result = undisclosed_model().classify(&record).unwrap();
    assert_eq!(result.verdict, Verdict::Ham);
    assert!(result.confidence > 0.9);
}

#[test]
fn test_linear_classifier_threshold() {
    let record = FeatureRecord::new(HeaderFeatures::default(), vec![0.0; DIMENSION]);
    let weights = vec![0.0; HeaderFeatures::NAMES.len() + DIMENSION];

    // Zero logit gives probability 0.5
    let model = LinearClassifier::new(weights.clone(), 0.0);
    assert_eq!(model.classify(&record).unwrap().verdict, Verdict::Spam);

    let strict = LinearClassifier::new(weights, 0.0).with_threshold(0.6);
    let result = strict.classify(&record).unwrap();
    assert_eq!(result.verdict, Verdict::Ham);
    assert!((result.confidence - 0.5).abs() < 1e-6);
}

#[test]
fn test_linear_classifier_weight_mismatch() {
    let record = pipeline().transform("Subject: hi").unwrap();
    let model = LinearClassifier::new(vec![1.0; 3], 0.0);

    let err = model.classify(&record).unwrap_err();
    assert!(matches!(err, FeatureError::Classification(_)));
    assert!(err.to_string().contains("expected 3 features, got 18"));
}

#[test]
fn test_linear_classifier_deserialize_default_threshold() {
    let model: LinearClassifier =
        serde_json::from_str(r#"{"weights": [0.5, -0.5], "bias": 0.1}"#).unwrap();
    assert_eq!(model.threshold, 0.5);
    assert_eq!(model.weights, vec![0.5, -0.5]);
}

// --- SpamFilter ---

#[test]
fn test_spam_filter_classifies_raw_email() {
    let filter = SpamFilter::new(pipeline(), Arc::new(undisclosed_model()));

    let spam = filter
        .classify("To: Undisclosed Recipients\nSubject: $$$\n\n<b>cash</b>")
        .unwrap();
    let ham = filter.classify("To: team@example.com\n\nstandup at 9").unwrap();

    assert!(spam.is_spam());
    assert!(!ham.is_spam());
}

#[test]
fn test_spam_filter_batch_order() {
    let filter = SpamFilter::new(pipeline(), Arc::new(undisclosed_model()));

    let verdicts: Vec<Verdict> = filter
        .classify_batch(&[
            "To: a@x.com\n\nhello",
            "To: undisclosed-recipients:;\n\nwin",
            "To: b@y.com\n\nlunch?",
        ])
        .unwrap()
        .into_iter()
        .map(|c| c.verdict)
        .collect();

    assert_eq!(verdicts, vec![Verdict::Ham, Verdict::Spam, Verdict::Ham]);
}

#[test]
fn test_spam_filter_propagates_classifier_error() {
    let filter = SpamFilter::new(pipeline(), Arc::new(LinearClassifier::new(vec![], 0.0)));

    assert!(filter.classify("Subject: hi\n\nbody").is_err());
}
