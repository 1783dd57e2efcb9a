mod slippage_tests;
