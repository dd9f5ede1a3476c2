//! Macros for defining thin newtype wrappers around plain values.

/// Implement conversions, [core::ops::Deref] and const accessors for a newtype with a single
/// `inner` field.
#[macro_export]
macro_rules! impl_basic {
    ($name: ident, $type: ty) => {
        $crate::impl_conversion!($name, $type);
        $crate::impl_deref!($name, $type);

        impl $name {
            pub const fn from_const(value: $type) -> Self {
                $name { inner: value }
            }
            pub const fn into_const(self) -> $type {
                self.inner
            }
        }
    };
}

/// Implement `From` in both directions between a newtype and its `inner` value.
#[macro_export]
macro_rules! impl_conversion {
    ($name: ident, $type: ty) => {
        impl core::convert::From<$type> for $name {
            fn from(value: $type) -> Self {
                $name { inner: value }
            }
        }
        impl core::convert::From<$name> for $type {
            fn from(value: $name) -> Self {
                value.inner
            }
        }
    };
}

/// Implement [core::ops::Deref] and [core::ops::DerefMut] to the `inner` field.
#[macro_export]
macro_rules! impl_deref {
    ($name: ident, $type: ty) => {
        impl core::ops::Deref for $name {
            type Target = $type;

            fn deref(&self) -> &Self::Target {
                &self.inner
            }
        }

        impl core::ops::DerefMut for $name {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.inner
            }
        }
    };
}

/// Defines a packed struct with [core::ops::Deref], [core::ops::DerefMut], and utility methods.
/// Supports variants: copy, address, or default.
#[macro_export]
macro_rules! define_struct {
    (copy, $name: ident, $type: ty) => {
        #[allow(missing_docs)]
        #[derive(Debug, Copy, Clone, Eq, PartialEq)]
        #[repr(C)]
        pub struct $name {
            inner: $type,
        }

        $crate::impl_basic!($name, $type);
    };

    // Same as `copy`, but prints as a hex address.
    (address, $name: ident, $type: ty) => {
        #[allow(missing_docs)]
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[repr(C)]
        pub struct $name {
            inner: $type,
        }

        $crate::impl_basic!($name, $type);

        impl core::fmt::Debug for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_fmt(format_args!("{:#x}", self.inner))
            }
        }

        impl core::fmt::LowerHex for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::LowerHex::fmt(&self.inner, f)
            }
        }
    };

    ($name: ident, $type: ty) => {
        #[allow(missing_docs)]
        #[derive(Debug)]
        #[repr(C)]
        pub struct $name {
            inner: $type,
        }

        $crate::impl_basic!($name, $type);
    };
}

/// Debug log, only compiled in debug mode.
#[macro_export]
macro_rules! debug_ex {
    // debug_ex!(target: "my_target", "a {} event", "log")
    (target: $target:expr, $($arg:tt)+) => {
        #[cfg(debug_assertions)]
        {
            log::log!(target: $target, log::Level::Debug, $($arg)+)
        }
    };

    // debug_ex!("a {} event", "log")
    ($($arg:tt)+) => {
        #[cfg(debug_assertions)]
        {
            log::log!(log::Level::Debug, $($arg)+)
        }
    };
}
