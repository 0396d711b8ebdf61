// SPDX-License-Identifier: Apache-2.0

//! Compile-time configuration validation
//!
//! Integer width and float behaviour are chosen with Cargo features. This
//! module rejects combinations that would leave the number parser without a
//! well-defined configured type or with two competing float policies.

// Exactly one integer width must be selected
#[cfg(not(any(feature = "int32", feature = "int64")))]
compile_error!("No integer width features selected: choose one of 'int32' or 'int64'");

#[cfg(all(feature = "int32", feature = "int64"))]
compile_error!(
    "Cannot enable both 'int32' and 'int64' features simultaneously: choose one integer width"
);

// Float policies only apply when real parsing is compiled out
#[cfg(all(feature = "float-error", feature = "float-truncate"))]
compile_error!("Cannot enable both 'float-error' and 'float-truncate' features simultaneously");

#[cfg(all(feature = "float", feature = "float-error"))]
compile_error!("Cannot enable both 'float' and 'float-error' features: 'float-error' is only for when float parsing is disabled");

#[cfg(all(feature = "float", feature = "float-truncate"))]
compile_error!("Cannot enable both 'float' and 'float-truncate' features: 'float-truncate' is only for when float parsing is disabled");
