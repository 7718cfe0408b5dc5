//! Shared fixtures: a small capability hierarchy and values for it.
//!
//! ```text
//! Bindable
//! ├── InputSource (X)
//! │   ├── Gamepad (Z)
//! │   └── Keyboard
//! └── AudioMixer (Y)
//! ```

use dependency_binding::{Bindable, BindingType, RegistryConfig, TypeCatalog};
use parking_lot::Mutex;
use std::sync::Arc;

pub const INPUT_SOURCE: &str = "InputSource";
pub const GAMEPAD: &str = "Gamepad";
pub const KEYBOARD: &str = "Keyboard";
pub const AUDIO_MIXER: &str = "AudioMixer";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gamepad {
    pub id: u32,
}

impl Bindable for Gamepad {
    fn binding_type(&self) -> BindingType {
        BindingType::new(GAMEPAD)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyboard {
    pub layout: &'static str,
}

impl Bindable for Keyboard {
    fn binding_type(&self) -> BindingType {
        BindingType::new(KEYBOARD)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioMixer;

impl Bindable for AudioMixer {
    fn binding_type(&self) -> BindingType {
        BindingType::new(AUDIO_MIXER)
    }
}

pub fn registry_config() -> RegistryConfig {
    RegistryConfig::new()
        .with_type(INPUT_SOURCE, &[])
        .with_type(GAMEPAD, &[BindingType::new(INPUT_SOURCE)])
        .with_type(KEYBOARD, &[BindingType::new(INPUT_SOURCE)])
        .with_type(AUDIO_MIXER, &[])
        .with_binding("player-input", INPUT_SOURCE)
        .with_binding("music", AUDIO_MIXER)
}

pub fn catalog() -> Arc<TypeCatalog> {
    Arc::new(
        registry_config()
            .build_catalog()
            .expect("fixture catalog is valid"),
    )
}

/// Records the gamepad ids each tagged listener received.
#[derive(Clone, Default)]
pub struct ListenerLog {
    entries: Arc<Mutex<Vec<(&'static str, u32)>>>,
}

impl ListenerLog {
    pub fn listener(&self, tag: &'static str) -> impl FnOnce(Arc<dyn Bindable>) + Send + 'static {
        let entries = Arc::clone(&self.entries);
        move |value: Arc<dyn Bindable>| {
            let id = value.downcast_ref::<Gamepad>().map_or(0, |pad| pad.id);
            entries.lock().push((tag, id));
        }
    }

    pub fn entries(&self) -> Vec<(&'static str, u32)> {
        self.entries.lock().clone()
    }

    pub fn count(&self, tag: &str) -> usize {
        self.entries.lock().iter().filter(|(t, _)| *t == tag).count()
    }
}
