//! Enumeration capability: members travel by symbolic name.

/// A fieldless enum whose members are encoded by name, never by any
/// underlying discriminant.
///
/// ```
/// use strong_json::Enumeration;
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Color { Red, Blue }
///
/// impl Enumeration for Color {
///     const TYPE_NAME: &'static str = "Color";
///     fn members() -> &'static [Self] { &[Color::Red, Color::Blue] }
///     fn name(&self) -> &'static str {
///         match self { Color::Red => "RED", Color::Blue => "Blue" }
///     }
/// }
///
/// assert_eq!(Color::from_name("RED"), Some(Color::Red));
/// assert_eq!(Color::from_name("red"), None);
/// ```
pub trait Enumeration: Copy + 'static {
    const TYPE_NAME: &'static str;

    fn members() -> &'static [Self];

    /// Symbolic name of this member.
    fn name(&self) -> &'static str;

    fn from_name(name: &str) -> Option<Self> {
        Self::members().iter().copied().find(|m| m.name() == name)
    }

    fn member_names() -> Vec<&'static str> {
        Self::members().iter().map(|m| m.name()).collect()
    }
}
