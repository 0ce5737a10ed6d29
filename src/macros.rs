/// Declares a master element struct together with its schema.
///
/// Each field line is `ID => name: kind`, where `kind` is one of `uint`,
/// `sint`, `float`, `string`, `binary`, `ebml_id` or the name of another
/// master type. Wrapping the kind in brackets (`[uint]`, `[Seek]`) makes the
/// field multi-valued. IDs are decoded values, i.e. without the length marker
/// bit.
///
/// ```rust
/// use ebmlstream::{ebml_master, parse_element, Bump, ParseOptions};
///
/// ebml_master! {
///     /// One entry of a seek index.
///     pub struct Seek<'a>("Seek") {
///         0x13AB => seek_id: ebml_id,
///         0x13AC => seek_position: uint,
///     }
/// }
///
/// ebml_master! {
///     pub struct SeekHead<'a>("SeekHead") {
///         0x0DBB => seeks: [Seek],
///     }
/// }
///
/// // Seek { SeekID = 0x0549A966, SeekPosition = 4096 }
/// let data = [
///     0x4D, 0xBB, 0x8C,
///     0x53, 0xAB, 0x84, 0x15, 0x49, 0xA9, 0x66,
///     0x53, 0xAC, 0x82, 0x10, 0x00,
/// ];
/// let arena = Bump::new();
/// let parsed = parse_element::<SeekHead>(&data, &arena, &ParseOptions::default())?;
/// assert!(!parsed.has_errors);
/// assert_eq!(parsed.value.seeks.len(), 1);
/// assert_eq!(parsed.value.seeks[0].seek_id, Some(0x0549_A966));
/// assert_eq!(parsed.value.seeks[0].seek_position, Some(4096));
/// # Ok::<(), ebmlstream::Error>(())
/// ```
#[macro_export]
macro_rules! ebml_master {
    (@storage $lt:lifetime, [$kind:tt]) => {
        $crate::schema::List<$lt, $crate::ebml_master!(@value $lt, $kind)>
    };
    (@storage $lt:lifetime, $kind:tt) => {
        ::core::option::Option<$crate::ebml_master!(@value $lt, $kind)>
    };

    (@value $lt:lifetime, uint) => { u64 };
    (@value $lt:lifetime, sint) => { i64 };
    (@value $lt:lifetime, float) => { f64 };
    (@value $lt:lifetime, string) => { &$lt [u8] };
    (@value $lt:lifetime, binary) => { &$lt [u8] };
    (@value $lt:lifetime, ebml_id) => { u32 };
    (@value $lt:lifetime, $master:ident) => { $master<$lt> };

    (@multiple [$kind:tt]) => { true };
    (@multiple $kind:tt) => { false };

    (@kind [$kind:tt]) => { $crate::ebml_master!(@kind $kind) };
    (@kind uint) => { $crate::schema::ElementKind::UInt };
    (@kind sint) => { $crate::schema::ElementKind::SInt };
    (@kind float) => { $crate::schema::ElementKind::Float };
    (@kind string) => { $crate::schema::ElementKind::String };
    (@kind binary) => { $crate::schema::ElementKind::Binary };
    (@kind ebml_id) => { $crate::schema::ElementKind::EbmlId };
    (@kind $master:ident) => { $crate::schema::ElementKind::Master };

    (@access [$kind:tt], $field:expr) => { $crate::ebml_master!(@access_many $kind, $field) };
    (@access uint, $field:expr) => {
        $crate::schema::FieldMut::UInt($crate::schema::Slot::One($field))
    };
    (@access sint, $field:expr) => {
        $crate::schema::FieldMut::SInt($crate::schema::Slot::One($field))
    };
    (@access float, $field:expr) => {
        $crate::schema::FieldMut::Float($crate::schema::Slot::One($field))
    };
    (@access string, $field:expr) => {
        $crate::schema::FieldMut::Bytes($crate::schema::Slot::One($field))
    };
    (@access binary, $field:expr) => {
        $crate::schema::FieldMut::Bytes($crate::schema::Slot::One($field))
    };
    (@access ebml_id, $field:expr) => {
        $crate::schema::FieldMut::EbmlId($crate::schema::Slot::One($field))
    };
    (@access $master:ident, $field:expr) => { $crate::schema::FieldMut::Master($field) };

    (@access_many uint, $field:expr) => {
        $crate::schema::FieldMut::UInt($crate::schema::Slot::Many($field))
    };
    (@access_many sint, $field:expr) => {
        $crate::schema::FieldMut::SInt($crate::schema::Slot::Many($field))
    };
    (@access_many float, $field:expr) => {
        $crate::schema::FieldMut::Float($crate::schema::Slot::Many($field))
    };
    (@access_many string, $field:expr) => {
        $crate::schema::FieldMut::Bytes($crate::schema::Slot::Many($field))
    };
    (@access_many binary, $field:expr) => {
        $crate::schema::FieldMut::Bytes($crate::schema::Slot::Many($field))
    };
    (@access_many ebml_id, $field:expr) => {
        $crate::schema::FieldMut::EbmlId($crate::schema::Slot::Many($field))
    };
    (@access_many $master:ident, $field:expr) => { $crate::schema::FieldMut::Master($field) };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident<$lt:lifetime>($ename:literal) {
            $(
                $(#[$fmeta:meta])*
                $id:literal => $field:ident : $kind:tt
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Default)]
        $vis struct $name<$lt> {
            $(
                $(#[$fmeta])*
                pub $field: $crate::ebml_master!(@storage $lt, $kind),
            )*
            _arena: ::core::marker::PhantomData<&$lt ()>,
        }

        impl<$lt> $name<$lt> {
            /// The element's schema.
            pub fn descriptor() -> &'static $crate::schema::ElementDesc {
                static DESC: $crate::schema::ElementDesc = $crate::schema::ElementDesc {
                    name: $ename,
                    size: ::core::mem::size_of::<$name<'static>>(),
                    fields: &[
                        $(
                            $crate::schema::FieldDesc {
                                id: $id,
                                name: stringify!($field),
                                multiple: $crate::ebml_master!(@multiple $kind),
                                kind: $crate::ebml_master!(@kind $kind),
                            },
                        )*
                    ],
                };
                &DESC
            }
        }

        impl<$lt> $crate::schema::Master<$lt> for $name<$lt> {
            fn desc(&self) -> &'static $crate::schema::ElementDesc {
                Self::descriptor()
            }

            fn field(&mut self, id: u32) -> ::core::option::Option<$crate::schema::FieldMut<'_, $lt>> {
                match id {
                    $( $id => ::core::option::Option::Some(
                        $crate::ebml_master!(@access $kind, &mut self.$field)
                    ), )*
                    _ => ::core::option::Option::None,
                }
            }
        }
    };
}
