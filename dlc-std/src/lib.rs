use dlc_interface::Registry;

pub mod common;
pub mod domainlist;
pub mod text;
pub mod v2ray;

/// Register all built-in converters.
pub fn init(registry: &mut Registry) {
    registry.add_input::<domainlist::DomainListIn>();

    registry.add_output::<text::TextOut>();
    registry.add_output::<v2ray::GeositeOut>();
}
