//! Proptest generators for property-based testing.

use proptest::prelude::*;

use namehop::auth::TimeBucket;
use namehop::{Keypair, Record};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a valid name.
pub fn name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,31}".prop_map(String::from)
}

/// Generate a valid href on a routable host.
pub fn href() -> impl Strategy<Value = String> {
    ("[a-z][a-z0-9]{0,11}", "(/[a-z0-9]{1,8}){0,3}")
        .prop_map(|(host, path)| format!("https://{host}.test.com{path}"))
}

/// Generate an ownership code. Non-empty by construction; empty codes mean
/// "no code" on the wire.
pub fn code() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9]{1,24}".prop_map(String::from)
}

/// Generate a reasonable timestamp in milliseconds.
pub fn timestamp() -> impl Strategy<Value = i64> {
    0i64..=4_102_444_800_000i64
}

/// Generate a time bucket.
pub fn time_bucket() -> impl Strategy<Value = TimeBucket> {
    (1u64..=68_400_000u64).prop_map(TimeBucket)
}

/// Parameters for generating a record.
#[derive(Debug, Clone)]
pub struct RecordParams {
    pub name: String,
    pub href: String,
    pub code: Option<String>,
    pub time: i64,
}

impl Arbitrary for RecordParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (name(), href(), prop::option::of(code()), timestamp())
            .prop_map(|(name, href, code, time)| RecordParams {
                name,
                href,
                code,
                time,
            })
            .boxed()
    }
}

/// Generate a record from parameters.
pub fn record_from_params(params: &RecordParams) -> Record {
    Record::create_at(
        &params.name,
        &params.href,
        params.code.as_deref(),
        params.time,
    )
    .expect("generated fields are valid")
}
