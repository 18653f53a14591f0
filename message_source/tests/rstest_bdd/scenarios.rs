//! Binds the feature files to the step registry.

use crate::fixtures::{ResolutionContext, context};
use rstest_bdd_macros::scenarios;

scenarios!(
    "tests/features/resolution.feature",
    fixtures = [context: ResolutionContext]
);
scenarios!(
    "tests/features/reload.feature",
    fixtures = [context: ResolutionContext]
);
