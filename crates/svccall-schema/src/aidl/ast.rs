/// A parsed AIDL file. Only interface declarations are retained.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AidlDocument {
    pub package: Option<String>,
    pub imports: Vec<String>,
    pub interfaces: Vec<InterfaceDecl>,
}

impl AidlDocument {
    pub fn interface(&self, name: &str) -> Option<&InterfaceDecl> {
        self.interfaces.iter().find(|iface| iface.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDecl {
    pub name: String,
    pub oneway: bool,
    /// Methods in declaration order.
    pub methods: Vec<MethodDecl>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub name: String,
    pub oneway: bool,
    pub return_type: TypeRef,
    pub parameters: Vec<Parameter>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
    InOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub direction: Option<Direction>,
    pub ty: TypeRef,
    pub name: String,
}

/// A type reference such as `int`, `String`, `byte[]` or `List<String>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    /// Dotted name as written (`String`, `android.os.Bundle`).
    pub name: String,
    pub generics: Vec<TypeRef>,
    /// Number of array suffixes.
    pub dimensions: usize,
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            generics: Vec::new(),
            dimensions: 0,
        }
    }

    pub fn array_of(name: impl Into<String>) -> Self {
        Self {
            dimensions: 1,
            ..Self::named(name)
        }
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)?;
        if !self.generics.is_empty() {
            f.write_str("<")?;
            for (i, generic) in self.generics.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{generic}")?;
            }
            f.write_str(">")?;
        }
        for _ in 0..self.dimensions {
            f.write_str("[]")?;
        }
        Ok(())
    }
}
