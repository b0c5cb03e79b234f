use std::collections::HashMap;

use svccall_parcel::{decode_int32, ParcelValue, WireType};
use tracing::debug;

use crate::aidl::{self, AidlDocument, MethodDecl, TypeRef};
use crate::error::{Result, SchemaError, SchemaPart};

/// Bytes taken by the status word that leads every reply.
const STATUS_WIDTH: usize = 4;

/// Wire-level description of one interface method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSchema {
    /// Transaction code: zero-based declaration index.
    pub code: u32,
    /// `None` when any parameter type cannot be mapped.
    pub argument_types: Option<Vec<WireType>>,
    /// `None` when the return type cannot be mapped.
    pub return_type: Option<WireType>,
    pub name: String,
}

/// Result of decoding a reply parcel: status word plus optional value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedReturn {
    pub status: i32,
    /// `None` for methods returning `void`.
    pub value: Option<ParcelValue>,
}

/// Ordered, immutable mapping from method name to [`MethodSchema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceRegistry {
    name: String,
    methods: Vec<MethodSchema>,
    index: HashMap<String, usize>,
}

/// Map a declared AIDL type to its wire type.
///
/// Returns `None` for anything outside the closed table.
pub fn map_type(ty: &TypeRef) -> Option<WireType> {
    // `byte[]` blobs (e.g. signatures) become a Void slot and are left off the
    // command line. This is the only array branch.
    if ty.name == "byte" && ty.generics.is_empty() && ty.dimensions == 1 {
        return Some(WireType::Void);
    }
    if !ty.generics.is_empty() || ty.dimensions != 0 {
        return None;
    }
    match ty.name.as_str() {
        "void" => Some(WireType::Void),
        "int" => Some(WireType::Int32),
        "long" => Some(WireType::Int64),
        "boolean" => Some(WireType::Bool),
        "String" | "java.lang.String" => Some(WireType::String),
        _ => None,
    }
}

impl MethodSchema {
    fn from_decl(code: u32, decl: &MethodDecl) -> Self {
        // One unmapped parameter invalidates the whole argument list; the
        // positions must stay aligned with the remote side.
        let argument_types = decl
            .parameters
            .iter()
            .map(|param| map_type(&param.ty))
            .collect::<Option<Vec<_>>>();
        let return_type = map_type(&decl.return_type);

        if argument_types.is_none() || return_type.is_none() {
            debug!(method = %decl.name, code, "method schema partially unknown");
        }

        Self {
            code,
            argument_types,
            return_type,
            name: decl.name.clone(),
        }
    }

    /// Whether both argument and return schemas are known.
    pub fn can_marshal(&self) -> bool {
        self.argument_types.is_some() && self.return_type.is_some()
    }

    /// Encode call arguments into `service call` tokens.
    ///
    /// `Void` positions still take a value but contribute no tokens.
    pub fn encode_arguments(&self, values: &[ParcelValue]) -> Result<Vec<String>> {
        let types = self
            .argument_types
            .as_ref()
            .ok_or_else(|| SchemaError::SchemaUnknown {
                method: self.name.clone(),
                part: SchemaPart::Arguments,
            })?;
        if types.len() != values.len() {
            return Err(SchemaError::ArityMismatch {
                method: self.name.clone(),
                expected: types.len(),
                given: values.len(),
            });
        }

        let mut tokens = Vec::new();
        for (wire_type, value) in types.iter().zip(values) {
            if *wire_type != WireType::Void {
                tokens.extend(wire_type.encode(value)?);
            }
        }
        Ok(tokens)
    }

    /// Decode a reply parcel: a leading status word, then the return value
    /// unless the method returns `void`.
    pub fn decode_return(&self, raw: &[u8]) -> Result<DecodedReturn> {
        let return_type = self.return_type.ok_or_else(|| SchemaError::SchemaUnknown {
            method: self.name.clone(),
            part: SchemaPart::Return,
        })?;

        let status = decode_int32(raw)?;
        let value = match return_type {
            WireType::Void => None,
            other => Some(other.decode(&raw[STATUS_WIDTH..])?.0),
        };
        Ok(DecodedReturn { status, value })
    }

    /// Human-readable signature, e.g. `bool isFoo(int32, void)`.
    pub fn signature(&self) -> String {
        let ret = self.return_type.map_or("?", WireType::name);
        let args = match &self.argument_types {
            Some(types) => types
                .iter()
                .map(|t| t.name())
                .collect::<Vec<_>>()
                .join(", "),
            None => "?".to_string(),
        };
        format!("{ret} {}({args})", self.name)
    }
}

impl InterfaceRegistry {
    /// Build the registry for `interface` from a parsed document.
    pub fn build(document: &AidlDocument, interface: &str) -> Result<Self> {
        let decl = document
            .interface(interface)
            .ok_or_else(|| SchemaError::InterfaceNotFound(interface.to_string()))?;

        let mut methods = Vec::with_capacity(decl.methods.len());
        let mut index = HashMap::with_capacity(decl.methods.len());
        for (position, method) in decl.methods.iter().enumerate() {
            if index.insert(method.name.clone(), position).is_some() {
                return Err(SchemaError::DuplicateMethod {
                    interface: interface.to_string(),
                    method: method.name.clone(),
                });
            }
            methods.push(MethodSchema::from_decl(position as u32, method));
        }

        debug!(interface, methods = methods.len(), "built interface registry");
        Ok(Self {
            name: interface.to_string(),
            methods,
            index,
        })
    }

    /// Parse AIDL text and build the registry for `interface`.
    pub fn from_aidl(source: &str, interface: &str) -> Result<Self> {
        let document = aidl::parse(source)?;
        Self::build(&document, interface)
    }

    /// Interface name this registry was built from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a method by name.
    pub fn method(&self, name: &str) -> Result<&MethodSchema> {
        self.index
            .get(name)
            .map(|&position| &self.methods[position])
            .ok_or_else(|| SchemaError::UnknownMethod(name.to_string()))
    }

    /// Methods in declaration (code) order.
    pub fn methods(&self) -> &[MethodSchema] {
        &self.methods
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}
