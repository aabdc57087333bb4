//! Process-wide default logger
//!
//! Until [`replace_globals`] is called the global logger writes JSON to
//! stdout at debug level. Loggers obtained from [`global`] before a
//! replacement keep working against the logger they were handed.

use super::context::Context;
use super::logger::Logger;
use crate::fields::{Field, Untyped};
use arc_swap::ArcSwap;
use once_cell::sync::Lazy;
use std::sync::Arc;

static GLOBAL: Lazy<ArcSwap<Logger>> = Lazy::new(|| ArcSwap::from_pointee(Logger::default()));

/// The current global logger
pub fn global() -> Arc<Logger> {
    GLOBAL.load_full()
}

/// Install `logger` as the global logger and return the previous one
pub fn replace_globals(logger: Logger) -> Arc<Logger> {
    GLOBAL.swap(Arc::new(logger))
}

#[track_caller]
pub fn debug(ctx: &Context, message: impl AsRef<str>, fields: impl IntoIterator<Item = Field>) {
    GLOBAL.load().debug(ctx, message, fields);
}

#[track_caller]
pub fn info(ctx: &Context, message: impl AsRef<str>, fields: impl IntoIterator<Item = Field>) {
    GLOBAL.load().info(ctx, message, fields);
}

#[track_caller]
pub fn warn(ctx: &Context, message: impl AsRef<str>, fields: impl IntoIterator<Item = Field>) {
    GLOBAL.load().warn(ctx, message, fields);
}

#[track_caller]
pub fn error(ctx: &Context, message: impl AsRef<str>, fields: impl IntoIterator<Item = Field>) {
    GLOBAL.load().error(ctx, message, fields);
}

#[track_caller]
pub fn panic(ctx: &Context, message: impl AsRef<str>, fields: impl IntoIterator<Item = Field>) -> ! {
    global().panic(ctx, message, fields)
}

#[track_caller]
pub fn fatal(ctx: &Context, message: impl AsRef<str>, fields: impl IntoIterator<Item = Field>) {
    global().fatal(ctx, message, fields);
}

#[track_caller]
pub fn debugw(ctx: &Context, message: impl AsRef<str>, key_values: impl IntoIterator<Item = Untyped>) {
    GLOBAL.load().debugw(ctx, message, key_values);
}

#[track_caller]
pub fn infow(ctx: &Context, message: impl AsRef<str>, key_values: impl IntoIterator<Item = Untyped>) {
    GLOBAL.load().infow(ctx, message, key_values);
}

#[track_caller]
pub fn warnw(ctx: &Context, message: impl AsRef<str>, key_values: impl IntoIterator<Item = Untyped>) {
    GLOBAL.load().warnw(ctx, message, key_values);
}

#[track_caller]
pub fn errorw(ctx: &Context, message: impl AsRef<str>, key_values: impl IntoIterator<Item = Untyped>) {
    GLOBAL.load().errorw(ctx, message, key_values);
}

#[track_caller]
pub fn panicw(ctx: &Context, message: impl AsRef<str>, key_values: impl IntoIterator<Item = Untyped>) -> ! {
    global().panicw(ctx, message, key_values)
}

#[track_caller]
pub fn fatalw(ctx: &Context, message: impl AsRef<str>, key_values: impl IntoIterator<Item = Untyped>) {
    global().fatalw(ctx, message, key_values);
}
