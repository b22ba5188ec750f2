#[cfg(feature = "core")]
#[doc(inline)]
pub use remo_core as core;

#[cfg(feature = "motif")]
#[doc(inline)]
pub use remo_motif as motif;

#[cfg(feature = "scan")]
#[doc(inline)]
pub use remo_scan as scan;

#[cfg(feature = "pipeline")]
#[doc(inline)]
pub use remo_pipeline as pipeline;

#[cfg(feature = "export")]
#[doc(inline)]
pub use remo_export as export;
