use alloc::string::String;

use crate::info::TypeInfo;

crate::cfg_debug! {
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use core::fmt;

    std::thread_local! {
        static TYPE_INFO_STACK: RefCell<TypeInfoStack> = const { RefCell::new(TypeInfoStack::new()) };
    }

    /// Stack of the types the current walk is inside of.
    struct TypeInfoStack {
        stack: Vec<&'static TypeInfo>,
    }

    impl TypeInfoStack {
        const fn new() -> Self {
            Self { stack: Vec::new() }
        }
    }

    impl fmt::Debug for TypeInfoStack {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let mut iter = self.stack.iter();
            if let Some(first) = iter.next() {
                write!(f, "`{}`", first.type_path())?;
            }
            for info in iter {
                write!(f, " -> `{}`", info.type_path())?;
            }
            Ok(())
        }
    }
}

/// Pops the type pushed by [`enter`] when dropped.
pub(crate) struct StackGuard(());

impl Drop for StackGuard {
    #[inline]
    fn drop(&mut self) {
        crate::cfg_debug! {
            TYPE_INFO_STACK.with_borrow_mut(|s| s.stack.pop());
        }
    }
}

/// Records that the walk entered a value of type `info`.
#[inline]
pub(crate) fn enter(info: &'static TypeInfo) -> StackGuard {
    crate::cfg_debug! {
        TYPE_INFO_STACK.with_borrow_mut(|s| s.stack.push(info));
    }
    let _ = info;
    StackGuard(())
}

/// Appends the type stack to an error message in debug builds.
pub(crate) fn describe(message: String) -> String {
    crate::cfg_debug! {
        if {
            TYPE_INFO_STACK.with_borrow(|s| {
                if s.stack.is_empty() {
                    message
                } else {
                    alloc::format!("{message} (stack: {s:?})")
                }
            })
        } else {
            message
        }
    }
}
