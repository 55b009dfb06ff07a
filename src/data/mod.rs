/// Data layer: decoding, normalization, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  decode   │  parse file → Vec<RawRecord>
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize │  clean + coerce → Vec<Record> → Dataset
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  exact-match criteria → active subset
///   └──────────┘
/// ```

pub mod decode;
pub mod filter;
pub mod model;
pub mod normalize;
