// SPDX-License-Identifier: MIT OR Apache-2.0
//! Materials.
//!
//! A material is a small stack of shading layers plus a few global
//! settings (alpha test, height mapping, double-sidedness). Textures are
//! kept as file references; loading them is the renderer's business.

use glam::Vec4;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Most layers a material can hold
pub const MAX_MATERIAL_LAYERS: usize = 3;

/// Errors from material edits
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MaterialError {
    /// The layer stack is full
    #[error("Exceeded the number of supported layers, can not add any more")]
    TooManyLayers,

    /// No layer at this index
    #[error("Layer {0} does not exist")]
    NoSuchLayer(usize),
}

/// Shading model of a layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayerType {
    /// Diffuse
    #[default]
    Lambert,
    /// Metal, with a complex index of refraction
    Conductor,
    /// Glass-like, with a real index of refraction
    Dielectric,
    /// Emits its albedo
    Emissive,
    /// Shaded by user code
    Custom,
}

impl LayerType {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Lambert => "Lambert",
            Self::Conductor => "Conductor",
            Self::Dielectric => "Dielectric",
            Self::Emissive => "Emissive",
            Self::Custom => "Custom",
        }
    }

    /// Whether the layer has a roughness value
    pub fn has_roughness(&self) -> bool {
        matches!(self, Self::Conductor | Self::Dielectric)
    }

    /// Whether the layer has an albedo color
    pub fn has_albedo(&self) -> bool {
        !matches!(self, Self::Custom)
    }

    /// All types, in display order
    pub const ALL: [LayerType; 5] = [
        Self::Lambert,
        Self::Conductor,
        Self::Dielectric,
        Self::Emissive,
        Self::Custom,
    ];
}

/// Microfacet normal distribution of a layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayerNdf {
    /// Beckmann
    Beckmann,
    /// Trowbridge-Reitz
    #[default]
    Ggx,
    /// Provided by user code
    User,
}

impl LayerNdf {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Beckmann => "Beckmann",
            Self::Ggx => "GGX",
            Self::User => "User Defined",
        }
    }

    /// All distributions, in display order
    pub const ALL: [LayerNdf; 3] = [Self::Beckmann, Self::Ggx, Self::User];
}

/// How a layer combines with the layers below it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayerBlend {
    /// Weighted by the Fresnel term
    #[default]
    Fresnel,
    /// Added
    Additive,
    /// Weighted by a constant factor
    Constant,
}

impl LayerBlend {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Fresnel => "Fresnel",
            Self::Additive => "Additive",
            Self::Constant => "Constant Factor",
        }
    }

    /// All blend modes, in display order
    pub const ALL: [LayerBlend; 3] = [Self::Fresnel, Self::Additive, Self::Constant];
}

/// One shading layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialLayer {
    /// Shading model
    pub kind: LayerType,
    /// Normal distribution
    pub ndf: LayerNdf,
    /// Blend with lower layers
    pub blend: LayerBlend,
    /// RGBA color
    pub albedo: Vec4,
    /// Roughness in `[0, 1]`
    pub roughness: f32,
    /// Model-specific parameters (index of refraction)
    pub extra: Vec4,
    /// Albedo texture file
    #[serde(default)]
    pub texture: Option<PathBuf>,
}

impl Default for MaterialLayer {
    fn default() -> Self {
        Self {
            kind: LayerType::default(),
            ndf: LayerNdf::default(),
            blend: LayerBlend::default(),
            albedo: Vec4::ZERO,
            roughness: 0.0,
            extra: Vec4::ZERO,
            texture: None,
        }
    }
}

impl MaterialLayer {
    /// Create a layer of the given type
    pub fn new(kind: LayerType) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Set the roughness, clamped to `[0, 1]`
    pub fn set_roughness(&mut self, roughness: f32) {
        self.roughness = roughness.clamp(0.0, 1.0);
    }

    /// Real and imaginary part of a conductor's index of refraction
    pub fn conductor_ior(&self) -> (f32, f32) {
        (self.extra.x, self.extra.y)
    }

    /// Set a conductor's index of refraction. Negative parts clamp to zero.
    pub fn set_conductor_ior(&mut self, real: f32, imaginary: f32) {
        self.extra = Vec4::new(real.max(0.0), imaginary.max(0.0), 0.0, 0.0);
    }

    /// Index of refraction of a dielectric
    pub fn dielectric_ior(&self) -> f32 {
        self.extra.x
    }

    /// Set a dielectric's index of refraction. Negative values clamp to zero.
    pub fn set_dielectric_ior(&mut self, ior: f32) {
        self.extra = Vec4::new(ior.max(0.0), 0.0, 0.0, 0.0);
    }
}

/// Texture slot of a material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    /// Tangent-space normal map
    Normal,
    /// Alpha-test mask
    Alpha,
    /// Height map
    Height,
    /// Albedo texture of a layer
    Layer(usize),
}

impl TextureSlot {
    /// Get the display name
    pub fn name(&self) -> String {
        match self {
            Self::Normal => "Normal Map".to_string(),
            Self::Alpha => "Alpha Map".to_string(),
            Self::Height => "Height Map".to_string(),
            Self::Layer(index) => format!("Layer {index} Texture"),
        }
    }
}

/// A layered material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Display name
    pub name: String,
    /// Numeric id used by shaders
    pub id: u32,
    /// Shade back faces too
    pub double_sided: bool,
    alpha_threshold: f32,
    height_bias: f32,
    height_scale: f32,
    /// Normal map file
    #[serde(default)]
    pub normal_map: Option<PathBuf>,
    /// Alpha map file
    #[serde(default)]
    pub alpha_map: Option<PathBuf>,
    /// Height map file
    #[serde(default)]
    pub height_map: Option<PathBuf>,
    #[serde(default)]
    layers: Vec<MaterialLayer>,
}

impl Default for Material {
    fn default() -> Self {
        Self::new("Material")
    }
}

impl Material {
    /// Create a material with no layers
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: 0,
            double_sided: false,
            alpha_threshold: 0.5,
            height_bias: 0.0,
            height_scale: 1.0,
            normal_map: None,
            alpha_map: None,
            height_map: None,
            layers: Vec::new(),
        }
    }

    /// Alpha-test threshold
    pub fn alpha_threshold(&self) -> f32 {
        self.alpha_threshold
    }

    /// Set the alpha-test threshold, clamped to `[0, 1]`
    pub fn set_alpha_threshold(&mut self, threshold: f32) {
        self.alpha_threshold = threshold.clamp(0.0, 1.0);
    }

    /// Height map bias and scale
    pub fn height_modifiers(&self) -> (f32, f32) {
        (self.height_bias, self.height_scale)
    }

    /// Set height map bias and scale. A negative scale clamps to zero.
    pub fn set_height_modifiers(&mut self, bias: f32, scale: f32) {
        self.height_bias = bias;
        self.height_scale = scale.max(0.0);
    }

    /// Layers, bottom first
    pub fn layers(&self) -> &[MaterialLayer] {
        &self.layers
    }

    /// Number of layers
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Layer by index
    pub fn layer(&self, index: usize) -> Option<&MaterialLayer> {
        self.layers.get(index)
    }

    /// Mutable layer by index
    pub fn layer_mut(&mut self, index: usize) -> Option<&mut MaterialLayer> {
        self.layers.get_mut(index)
    }

    /// Whether another layer fits
    pub fn can_add_layer(&self) -> bool {
        self.layers.len() < MAX_MATERIAL_LAYERS
    }

    /// Push a layer on top of the stack. Returns its index.
    pub fn add_layer(&mut self, layer: MaterialLayer) -> Result<usize, MaterialError> {
        if !self.can_add_layer() {
            return Err(MaterialError::TooManyLayers);
        }
        self.layers.push(layer);
        debug!("Material '{}' now has {} layers", self.name, self.layers.len());
        Ok(self.layers.len() - 1)
    }

    /// Remove a layer, shifting the ones above it down
    pub fn remove_layer(&mut self, index: usize) -> Result<MaterialLayer, MaterialError> {
        if index >= self.layers.len() {
            return Err(MaterialError::NoSuchLayer(index));
        }
        Ok(self.layers.remove(index))
    }

    /// Change the shading model of a layer
    pub fn set_layer_type(&mut self, index: usize, kind: LayerType) -> Result<(), MaterialError> {
        let layer = self.layers.get_mut(index).ok_or(MaterialError::NoSuchLayer(index))?;
        if layer.kind != kind {
            layer.kind = kind;
            layer.extra = Vec4::ZERO;
        }
        Ok(())
    }

    /// Texture file in a slot
    pub fn texture(&self, slot: TextureSlot) -> Option<&PathBuf> {
        match slot {
            TextureSlot::Normal => self.normal_map.as_ref(),
            TextureSlot::Alpha => self.alpha_map.as_ref(),
            TextureSlot::Height => self.height_map.as_ref(),
            TextureSlot::Layer(index) => self.layers.get(index)?.texture.as_ref(),
        }
    }

    /// Replace the texture in a slot
    pub fn set_texture(&mut self, slot: TextureSlot, file: Option<PathBuf>) -> Result<(), MaterialError> {
        match slot {
            TextureSlot::Normal => self.normal_map = file,
            TextureSlot::Alpha => self.alpha_map = file,
            TextureSlot::Height => self.height_map = file,
            TextureSlot::Layer(index) => {
                self.layers.get_mut(index).ok_or(MaterialError::NoSuchLayer(index))?.texture = file;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_stack_is_bounded() {
        let mut material = Material::new("Brick");
        for expected in 0..MAX_MATERIAL_LAYERS {
            assert_eq!(material.add_layer(MaterialLayer::default()), Ok(expected));
        }
        assert!(!material.can_add_layer());
        assert_eq!(
            material.add_layer(MaterialLayer::default()),
            Err(MaterialError::TooManyLayers)
        );
        assert_eq!(material.layer_count(), MAX_MATERIAL_LAYERS);
    }

    #[test]
    fn test_remove_layer_shifts_stack() {
        let mut material = Material::new("Coated");
        material.add_layer(MaterialLayer::new(LayerType::Lambert)).unwrap();
        material.add_layer(MaterialLayer::new(LayerType::Dielectric)).unwrap();
        material.add_layer(MaterialLayer::new(LayerType::Conductor)).unwrap();

        let removed = material.remove_layer(1).unwrap();
        assert_eq!(removed.kind, LayerType::Dielectric);
        assert_eq!(material.layer(1).unwrap().kind, LayerType::Conductor);
        assert_eq!(material.remove_layer(5), Err(MaterialError::NoSuchLayer(5)));
    }

    #[test]
    fn test_values_are_clamped() {
        let mut material = Material::default();
        material.set_alpha_threshold(1.5);
        assert_eq!(material.alpha_threshold(), 1.0);
        material.set_height_modifiers(-0.25, -2.0);
        assert_eq!(material.height_modifiers(), (-0.25, 0.0));

        let mut layer = MaterialLayer::new(LayerType::Conductor);
        layer.set_roughness(-1.0);
        assert_eq!(layer.roughness, 0.0);
        layer.set_conductor_ior(0.2, -3.0);
        assert_eq!(layer.conductor_ior(), (0.2, 0.0));
    }

    #[test]
    fn test_type_change_resets_parameters() {
        let mut material = Material::default();
        let index = material.add_layer(MaterialLayer::new(LayerType::Dielectric)).unwrap();
        material.layer_mut(index).unwrap().set_dielectric_ior(1.5);

        material.set_layer_type(index, LayerType::Dielectric).unwrap();
        assert_eq!(material.layer(index).unwrap().dielectric_ior(), 1.5);

        material.set_layer_type(index, LayerType::Conductor).unwrap();
        assert_eq!(material.layer(index).unwrap().conductor_ior(), (0.0, 0.0));
        assert!(material.layer(index).unwrap().kind.has_roughness());
    }

    #[test]
    fn test_texture_slots() {
        let mut material = Material::default();
        material.set_texture(TextureSlot::Normal, Some("brick_n.png".into())).unwrap();
        assert_eq!(material.texture(TextureSlot::Normal), Some(&PathBuf::from("brick_n.png")));
        assert_eq!(
            material.set_texture(TextureSlot::Layer(0), Some("albedo.png".into())),
            Err(MaterialError::NoSuchLayer(0))
        );

        material.add_layer(MaterialLayer::default()).unwrap();
        material.set_texture(TextureSlot::Layer(0), Some("albedo.png".into())).unwrap();
        assert!(material.texture(TextureSlot::Layer(0)).is_some());
        assert!(material.texture(TextureSlot::Height).is_none());
    }
}
