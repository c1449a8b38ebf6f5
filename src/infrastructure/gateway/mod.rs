pub mod stub_gateway;
