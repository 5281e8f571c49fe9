//! Design-time licensing context used while components are constructed.

use std::cell::{ Cell, RefCell };
use std::collections::HashMap ;



/// Whether licenses are being checked at runtime or while designing.
#[derive( Copy, Clone, Eq, PartialEq, Hash, Debug, Default )]
pub enum LicenseUsageMode {
	Runtime,
	#[default] Designtime,
}

/// Licensing state handed to [`Surface::create_instance`]( crate::Surface::create_instance ).
///
/// Each host owns one context. While the host constructs components the
/// context reports [`LicenseUsageMode::Designtime`] whatever mode it was built
/// with. Licensed component types can save the key they validated against so
/// it can be embedded in the generated code later.
#[derive( Debug, Default )]
pub struct LicenseContext {
	usage_mode: Cell<LicenseUsageMode>,
	saved_keys: RefCell<HashMap<String, String>>,
}

impl LicenseContext {

	/// A design-time context with no saved keys.
	pub fn design_time() -> Self { Self::default() }

	pub fn with_usage_mode( usage_mode: LicenseUsageMode ) -> Self {
		Self { usage_mode: Cell::new( usage_mode ), saved_keys: RefCell::default() }
	}

	#[inline] pub fn usage_mode( &self ) -> LicenseUsageMode { self.usage_mode.get() }

	/// The key saved for `component_type`, if any.
	pub fn saved_license_key( &self, component_type: &str ) -> Option<String> {
		self.saved_keys.borrow().get( component_type ).cloned()
	}

	pub fn set_saved_license_key( &self, component_type: impl Into<String>, key: impl Into<String> ) {
		self.saved_keys.borrow_mut().insert( component_type.into(), key.into() );
	}

}

/// Marks the host as constructing components for as long as it is alive.
///
/// Only the outermost scope in a chain of nested `create_component` calls
/// takes ownership of the flag and switches the context to design time; inner
/// scopes find both already in place and leave them alone on drop.
pub(crate) struct LicenseScope<'a> {
	flag: &'a Cell<bool>,
	context: &'a LicenseContext,
	restore: Option<LicenseUsageMode>,
}

impl<'a> LicenseScope<'a> {

	pub(crate) fn enter( flag: &'a Cell<bool>, context: &'a LicenseContext ) -> Self {
		let restore = match flag.replace( true ) {
			true => None,
			false => Some( context.usage_mode.replace( LicenseUsageMode::Designtime )),
		};
		Self { flag, context, restore }
	}

	#[inline] pub(crate) fn is_outermost( &self ) -> bool { self.restore.is_some() }

}

impl Drop for LicenseScope<'_> {
	fn drop( &mut self ) {
		if let Some( usage_mode ) = self.restore.take() {
			self.context.usage_mode.set( usage_mode );
			self.flag.set( false );
		}
	}
}

#[cfg( test )]
mod tests {

	use std::cell::Cell ;
	use super::{ LicenseContext, LicenseScope, LicenseUsageMode };

	#[test]
	fn outermost_scope_switches_to_design_time_and_restores() {

		let flag = Cell::new( false );
		let context = LicenseContext::with_usage_mode( LicenseUsageMode::Runtime );

		let outer = LicenseScope::enter( &flag, &context );
		assert!( outer.is_outermost() );
		assert_eq!( context.usage_mode(), LicenseUsageMode::Designtime );

		let inner = LicenseScope::enter( &flag, &context );
		assert!( !inner.is_outermost() );
		drop( inner );
		assert!( flag.get() );
		assert_eq!( context.usage_mode(), LicenseUsageMode::Designtime );

		drop( outer );
		assert!( !flag.get() );
		assert_eq!( context.usage_mode(), LicenseUsageMode::Runtime );

	}

}
