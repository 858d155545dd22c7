//! Filter parameter descriptors for host-side introspection.
//!
//! A host UI binds sliders to filter setters through these descriptors;
//! the pipeline itself never reads them.

use serde::{Deserialize, Serialize};

use crate::kernels;

/// Parameter value types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    Float(f32),
    Int(i32),
    Bool(bool),
}

/// Parameter descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamDescriptor {
    pub name: String,
    pub display_name: String,
    pub default: ParamValue,
    pub min: Option<ParamValue>,
    pub max: Option<ParamValue>,
}

/// Descriptor for one built-in filter kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterDescriptor {
    pub name: String,
    pub kernel: String,
    pub params: Vec<ParamDescriptor>,
}

/// Descriptors for the built-in filters.
pub fn builtin_filters() -> Vec<FilterDescriptor> {
    vec![
        FilterDescriptor {
            name: "Gaussian Blur".into(),
            kernel: kernels::GAUSSIAN_BLUR_2D.into(),
            params: vec![
                ParamDescriptor {
                    name: "radius".into(),
                    display_name: "Radius".into(),
                    default: ParamValue::Float(1.0),
                    min: Some(ParamValue::Float(0.0)),
                    max: Some(ParamValue::Float(32.0)),
                },
                ParamDescriptor {
                    name: "sigma".into(),
                    display_name: "Sigma".into(),
                    default: ParamValue::Float(0.5),
                    min: Some(ParamValue::Float(0.0)),
                    max: Some(ParamValue::Float(16.0)),
                },
            ],
        },
        FilterDescriptor {
            name: "Saturation".into(),
            kernel: kernels::SATURATION_ADJUST.into(),
            params: vec![ParamDescriptor {
                name: "saturation".into(),
                display_name: "Saturation".into(),
                default: ParamValue::Float(1.0),
                min: Some(ParamValue::Float(0.0)),
                max: Some(ParamValue::Float(2.0)),
            }],
        },
    ]
}
