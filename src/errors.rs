//! Error Types
//!
//! This module defines the error types used throughout the engine.
//!
//! # Overview
//!
//! The main error type [`LoupeError`] covers all failure modes including:
//! - GPU context acquisition failures
//! - Image fetching and decoding errors
//! - Texture creation failures
//! - Configuration validation errors
//!
//! # Usage
//!
//! All fallible public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, LoupeError>`.
//!
//! The engine never surfaces errors during steady-state operation: a failed
//! LOD production keeps the last good frame and retries, a missing clipboard
//! degrades to a logged warning. Only [`load`](crate::engine::ViewerEngine::load)
//! and [`copy_original_to_clipboard`](crate::engine::ViewerEngine::copy_original_to_clipboard)
//! propagate failures to the caller.

use thiserror::Error;

/// The main error type for the Loupe engine.
///
/// Each variant provides specific context about what went wrong.
#[derive(Error, Debug)]
pub enum LoupeError {
    // ========================================================================
    // GPU & Rendering Errors
    // ========================================================================
    /// No hardware-accelerated context could be acquired. Fatal at construction.
    #[error("Failed to acquire GPU context: {0}")]
    ContextUnavailable(String),

    /// Failed to create the GPU device.
    #[error("Failed to create WGPU device: {0}")]
    DeviceCreateFailed(#[from] wgpu::RequestDeviceError),

    /// Window system error.
    #[error("Window system error: {0}")]
    WindowError(#[from] raw_window_handle::HandleError),

    /// Event loop error (winit).
    #[error("Event loop error: {0}")]
    EventLoopError(#[from] winit::error::EventLoopError),

    // ========================================================================
    // Image Source Errors
    // ========================================================================
    /// The image source could not be fetched.
    #[error("Failed to fetch image source '{url}': {reason}")]
    FetchFailed {
        /// The URL that was requested
        url: String,
        /// What went wrong
        reason: String,
    },

    /// The image bytes could not be decoded.
    #[error("Image decode error: {0}")]
    DecodeFailed(String),

    /// The image could not be re-encoded for export.
    #[error("Image encode error: {0}")]
    EncodeFailed(String),

    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    // ========================================================================
    // Texture Errors
    // ========================================================================
    /// All production paths for an LOD texture failed.
    #[error("Texture creation failed for LOD {level}: {reason}")]
    TextureCreation {
        /// LOD level index that was requested
        level: usize,
        /// What went wrong
        reason: String,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// A configuration value or LOD table failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // Host Integration Errors
    // ========================================================================
    /// No clipboard backend is installed. Non-fatal; callers may ignore it.
    #[error("Clipboard is not supported on this host")]
    ClipboardUnsupported,

    /// An operation was invoked after [`destroy`](crate::engine::ViewerEngine::destroy).
    #[error("Engine has been destroyed")]
    Destroyed,
}

impl From<image::ImageError> for LoupeError {
    fn from(err: image::ImageError) -> Self {
        LoupeError::DecodeFailed(err.to_string())
    }
}

/// Alias for `Result<T, LoupeError>`.
pub type Result<T> = std::result::Result<T, LoupeError>;
