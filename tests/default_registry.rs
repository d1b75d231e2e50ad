//! The process-wide registry behind the top-level helpers. Kept in its own
//! test binary because it mutates global state.
use scitypes_core::convention::CustomConvention;
use scitypes_core::{
    activate_convention, current_convention, register_convention, reset_convention, scitype,
    ScitypeError, Tag, Value,
};
use std::sync::Arc;

#[test]
fn default_registry_lifecycle() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    assert_eq!(current_convention().name(), "baseline");
    assert_eq!(scitype(&Value::Int(7)), Tag::Count);

    let ints_are_continuous = CustomConvention::new("ints-are-continuous", |v| match v {
        Value::Int(_) => Some(Tag::Continuous),
        _ => None,
    })
    .extending(current_convention());
    register_convention(Arc::new(ints_are_continuous)).unwrap();
    assert_eq!(
        activate_convention("missing-one"),
        Err(ScitypeError::UnknownConvention("missing-one".into()))
    );

    activate_convention("ints-are-continuous").unwrap();
    assert_eq!(scitype(&Value::Int(7)), Tag::Continuous);
    assert_eq!(scitype(&Value::from("x")), Tag::Textual);

    reset_convention();
    assert_eq!(scitype(&Value::Int(7)), Tag::Count);
}
