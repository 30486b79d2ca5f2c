//! # Font Program Cache
//!
//! A process-wide identity cache: at most one parsed program is ever on
//! record per [`FontCacheKey`]. Entries are never evicted; [`clear`] is the
//! only way to drop them, and it does not affect programs callers already
//! hold.
//!
//! When several threads parse the same font concurrently, the first
//! [`save`] wins and every later caller receives the winner back.
//!
//! [`clear`]: FontProgramCache::clear
//! [`save`]: FontProgramCache::save

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use log::debug;
use once_cell::sync::Lazy;

use super::key::FontCacheKey;
use super::FontProgram;

static GLOBAL_CACHE: Lazy<FontProgramCache> = Lazy::new(FontProgramCache::new);

#[derive(Debug, Default)]
pub struct FontProgramCache {
    programs: RwLock<HashMap<FontCacheKey, Arc<FontProgram>>>,
}

impl FontProgramCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cache shared by the whole process.
    pub fn global() -> &'static FontProgramCache {
        &GLOBAL_CACHE
    }

    pub fn get(&self, key: &FontCacheKey) -> Option<Arc<FontProgram>> {
        self.programs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Record `program` under `key` unless a program is already there.
    /// Returns whichever program is on record afterwards.
    pub fn save(&self, program: Arc<FontProgram>, key: FontCacheKey) -> Arc<FontProgram> {
        let mut programs = self.programs.write().unwrap_or_else(PoisonError::into_inner);
        let on_record = programs.entry(key).or_insert_with(|| Arc::clone(&program));
        if !Arc::ptr_eq(on_record, &program) {
            debug!(
                "Font {} already cached, discarding duplicate parse",
                on_record.font_names().font_name()
            );
        }
        Arc::clone(on_record)
    }

    pub fn clear(&self) {
        self.programs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.programs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
