//! The collaborators that own and populate a [`DesignerHost`].
//!
//! A [`Surface`] owns the host: it builds component instances and designers and
//! is told about every lifecycle transition. A [`DesignerLoader`] fills the host
//! with components, typically by parsing a serialized design.

use crate::{ ComponentHandle, ComponentType, DesignerError, DesignerHandle, DesignerHost, ExtenderProvider, LicenseContext, ServiceProvider };



/// The design surface that owns a [`DesignerHost`].
///
/// Services the surface resolves are visible through the host after the
/// host's own services.
pub trait Surface: ServiceProvider {

	/// Creates the designer for a newly sited component.
	///
	/// `root` is set for the first component of a load, which requires a
	/// designer exposing [`Designer::as_root_designer`]( crate::Designer::as_root_designer ).
	/// Other components may have no designer at all.
	///
	/// # Errors
	/// A failure rolls the component back out of its container.
	fn create_designer(
		&self,
		host: &DesignerHost,
		component: &ComponentHandle,
		root: bool,
	) -> Result<Option<DesignerHandle>, DesignerError> ;

	/// Instantiates a component of `component_type`.
	///
	/// The constructor may add the new component to `host` itself; the host
	/// then leaves it where it is. Returning `None` means the type does not
	/// produce a component.
	///
	/// # Errors
	/// Construction failures are returned to the caller of
	/// [`DesignerHost::create_component`].
	fn create_instance(
		&self,
		host: &DesignerHost,
		component_type: &ComponentType,
		license: &LicenseContext,
	) -> Result<Option<ComponentHandle>, DesignerError> ;

	/// The host is about to load.
	fn on_loading( &self ) {}

	/// The host finished loading, successfully or not.
	fn on_loaded( &self, _successful: bool, _errors: &[DesignerError] ) {}

	/// The host is about to unload its components.
	fn on_unloading( &self ) {}

	/// The host unloaded its components.
	fn on_unloaded( &self ) {}

	/// Writes pending changes back through the host's loader.
	///
	/// # Errors
	/// Propagates the loader's flush failure.
	fn flush( &self, host: &DesignerHost ) -> Result<(), DesignerError> {
		match host.loader() {
			Some( loader ) => loader.flush(),
			None => Ok(()),
		}
	}

	/// The host's view should become the active view.
	fn on_view_activate( &self ) {}

}

/// Populates a [`DesignerHost`] with components.
pub trait DesignerLoader {

	/// Starts loading into `host`.
	///
	/// A synchronous loader calls [`DesignerHost::end_load`] itself before
	/// returning. An error is captured by the host and reported as a failed load.
	///
	/// # Errors
	/// Any load failure; the host unloads and reports it through `end_load`.
	fn begin_load( &self, host: &DesignerHost ) -> Result<(), DesignerError> ;

	/// Whether the loader is still loading, e.g. waiting on a dependency.
	fn loading( &self ) -> bool { false }

	/// Writes pending changes back to the underlying design.
	///
	/// # Errors
	/// Serialization failures.
	fn flush( &self ) -> Result<(), DesignerError> { Ok(()) }

	/// Releases the loader when its host is disposed.
	fn dispose( &self ) {}

	/// Capability query for loaders that extend components.
	fn as_extender_provider( &self ) -> Option<&dyn ExtenderProvider> { None }

}
